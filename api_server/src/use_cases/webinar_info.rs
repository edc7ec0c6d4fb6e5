use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveTime, Offset, TimeZone, Utc};
use serde::Serialize;

use crate::domain::{Clock, Settings};

const TITLE: &str = "Python Full Stack in 5 Days";
const DURATION_DAYS: u64 = 5;
// India Standard Time, UTC+05:30.
const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;
const SESSION_HOUR: u32 = 19;
// Advertised seats left always fall in MIN_SEATS_LEFT..=MAX_SEATS_LEFT.
pub const MIN_SEATS_LEFT: u32 = 7;
pub const MAX_SEATS_LEFT: u32 = 49;

#[derive(Debug, Clone, Serialize)]
pub struct ModuleInfo {
    pub day: u32,
    pub title: &'static str,
    pub topics: &'static [&'static str],
}

const MODULES: [ModuleInfo; 5] = [
    ModuleInfo {
        day: 1,
        title: "Python foundations",
        topics: &["syntax and data types", "functions and modules", "virtual environments"],
    },
    ModuleInfo {
        day: 2,
        title: "Backend with Django",
        topics: &["models and views", "REST APIs", "authentication"],
    },
    ModuleInfo {
        day: 3,
        title: "Databases",
        topics: &["SQL essentials", "PostgreSQL", "ORM queries"],
    },
    ModuleInfo {
        day: 4,
        title: "Frontend with React",
        topics: &["components and state", "routing", "calling your API"],
    },
    ModuleInfo {
        day: 5,
        title: "Ship it",
        topics: &["deployment", "CI basics", "capstone project"],
    },
];

/// Marketing payload for the landing page, computed without any external call.
#[derive(Debug, Clone, Serialize)]
pub struct WebinarInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub duration_days: u64,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    pub time_zone: &'static str,
    pub price: f64,
    pub original_price: f64,
    pub currency: String,
    pub seats_total: u32,
    pub seats_left: u32,
    pub modules: Vec<ModuleInfo>,
}

pub struct WebinarInfoUseCase<'a, C> {
    pub clock: C,
    pub settings: &'a Settings,
}

impl<C: Clock> WebinarInfoUseCase<'_, C> {
    pub fn execute(&self) -> WebinarInfo {
        let ist = FixedOffset::east_opt(IST_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix());
        let today = self.clock.now().with_timezone(&ist).date_naive();

        // Next Monday, never today.
        let days_ahead = 7 - today.weekday().num_days_from_monday();
        let start_day = today + Days::new(u64::from(days_ahead));
        let session_time = NaiveTime::from_hms_opt(SESSION_HOUR, 0, 0).unwrap_or_default();
        let start_date = ist
            .from_local_datetime(&start_day.and_time(session_time))
            .single()
            .unwrap_or_else(|| self.clock.now().with_timezone(&ist));
        let end_date = start_date + Days::new(DURATION_DAYS - 1);

        // Deterministic per calendar day. Config load rejects seats_total below MAX_SEATS_LEFT.
        let seats_left =
            MIN_SEATS_LEFT + today.ordinal() % (MAX_SEATS_LEFT - MIN_SEATS_LEFT + 1);

        WebinarInfo {
            title: TITLE,
            description: "A hands-on live webinar that takes you from Python basics to a \
                          deployed full stack app in five evenings.",
            duration_days: DURATION_DAYS,
            start_date,
            end_date,
            time_zone: "Asia/Kolkata",
            price: self.settings.price,
            original_price: self.settings.original_price,
            currency: self.settings.currency.clone(),
            seats_total: self.settings.seats_total,
            seats_left,
            modules: MODULES.to_vec(),
        }
    }
}
