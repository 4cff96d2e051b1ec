//! The admin API resources.

mod applications;
mod articles;
mod careers;
mod certificates;
mod inquiries;
mod partners;
mod schedules;
mod testimonials;
mod users;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

pub use applications::Application;
pub use articles::Article;
pub use careers::Career;
pub use certificates::Certificate;
pub use inquiries::Inquiry;
pub use partners::Partner;
pub use schedules::Schedule;
pub use testimonials::Testimonial;
pub use users::User;

use crate::registry::ServiceRegistry;
use crate::resource::{ResourceProvider, lenient};
use crate::table::FieldValue;

/// Register every top-level resource, in picker order.
///
/// Applications are reached through their career and are not listed.
pub fn register_all(registry: &mut ServiceRegistry) {
    registry.register(ResourceProvider::<Article>::default());
    registry.register(ResourceProvider::<Career>::default());
    registry.register(ResourceProvider::<Certificate>::default());
    registry.register(ResourceProvider::<Inquiry>::default());
    registry.register(ResourceProvider::<Partner>::default());
    registry.register(ResourceProvider::<Schedule>::default());
    registry.register(ResourceProvider::<Testimonial>::default());
    registry.register(ResourceProvider::<User>::default());
}

/// Nested user record, e.g. the agent assigned to an inquiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
}

/// The agent name of an optional nested user.
fn agent(user: Option<&UserRef>) -> FieldValue {
    user.and_then(|u| u.name.clone())
        .map_or(FieldValue::Empty, FieldValue::Reference)
}

fn agent_cell(user: Option<&UserRef>) -> String {
    match agent(user) {
        FieldValue::Empty => "N/A".to_string(),
        other => other.display(),
    }
}

/// Parse the date formats the API emits.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %I:%M %p"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN)))
        .ok()
}

/// `dd-Mon-yyyy`, or `N/A` when missing or unparseable.
fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map_or_else(|| "N/A".to_string(), |dt| dt.format("%d-%b-%Y").to_string())
}

/// Last path segment of an uploaded file, or `fallback` when there is none.
fn file_name(path: Option<&str>, fallback: &str) -> String {
    path.and_then(|p| p.rsplit('/').next())
        .filter(|name| !name.trim().is_empty())
        .map_or_else(|| fallback.to_string(), str::to_string)
}

fn or_no_message(message: Option<&str>) -> String {
    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or("No message")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all_lists_top_level_resources() {
        let mut registry = ServiceRegistry::new();
        register_all(&mut registry);
        assert_eq!(
            registry.keys(),
            vec![
                "articles",
                "careers",
                "certificates",
                "inquiries",
                "partners",
                "schedules",
                "testimonials",
                "users"
            ]
        );
        assert!(registry.get("applications").is_none());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-03-05 14:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-05 14:30"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-05 02:30 PM"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-05T14:30:00Z"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-03-05"),
            NaiveDate::from_ymd_opt(2024, 3, 5).map(|d| d.and_time(NaiveTime::MIN))
        );
        assert_eq!(parse_timestamp("soon"), None);
    }

    #[test]
    fn test_format_date_falls_back() {
        assert_eq!(format_date(Some("2024-01-09")), "09-Jan-2024");
        assert_eq!(format_date(Some("garbage")), "N/A");
        assert_eq!(format_date(None), "N/A");
    }

    #[test]
    fn test_file_name_and_message_fallbacks() {
        assert_eq!(file_name(Some("uploads/partners/acme.png"), "No logo"), "acme.png");
        assert_eq!(file_name(Some(""), "No logo"), "No logo");
        assert_eq!(file_name(None, "No media available"), "No media available");
        assert_eq!(or_no_message(Some("  ")), "No message");
        assert_eq!(or_no_message(Some("Hi")), "Hi");
    }

    #[test]
    fn test_agent_reference() {
        let maria = UserRef {
            name: Some("Maria".to_string()),
        };
        assert_eq!(agent(Some(&maria)), FieldValue::Reference("Maria".to_string()));
        assert_eq!(agent_cell(None), "N/A");
        assert_eq!(agent_cell(Some(&UserRef::default())), "N/A");
    }
}
