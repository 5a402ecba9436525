//! Tool: current_time. Local wall-clock time in a chosen format.

use chrono::{DateTime, Datelike, Local, SecondsFormat, TimeZone, Timelike, Weekday};
use serde::Deserialize;
use serde_json::Value;

use mcp_dispatch::{Arguments, CapabilityDescriptor, ContentItem, HandlerResult, SchemaNode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    #[default]
    Iso,
    Japanese,
}

#[derive(Debug, Deserialize)]
struct CurrentTimeParams {
    #[serde(default)]
    format: TimeFormat,
}

pub fn definition() -> CapabilityDescriptor {
    CapabilityDescriptor::new(
        "current_time",
        "Return the server's current local time",
        SchemaNode::object()
            .property(
                "format",
                SchemaNode::string()
                    .describe("Output format: \"iso\" (RFC 3339) or \"japanese\"")
                    .one_of(["iso", "japanese"])
                    .with_default("iso"),
            )
            .closed(),
    )
}

pub async fn execute(args: Arguments) -> HandlerResult {
    let params: CurrentTimeParams = serde_json::from_value(Value::Object(args))?;
    let formatted = format_time(&Local::now(), params.format);
    Ok(vec![ContentItem::text(format!("Current time: {formatted}"))])
}

pub fn format_time<Tz>(time: &DateTime<Tz>, format: TimeFormat) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match format {
        TimeFormat::Iso => time.to_rfc3339_opts(SecondsFormat::Secs, false),
        TimeFormat::Japanese => format!(
            "{}年{:02}月{:02}日 {:02}時{:02}分{:02}秒 ({})",
            time.year(),
            time.month(),
            time.day(),
            time.hour(),
            time.minute(),
            time.second(),
            weekday_ja(time.weekday())
        ),
    }
}

fn weekday_ja(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
        Weekday::Sun => "日",
    }
}
