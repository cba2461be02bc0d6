//! Plain text listing of an object's picklists

use super::schema::NormalizedPicklistSchema;

/// Returned when there is nothing to list
pub const NO_PICKLISTS: &str = "No picklist fields found for this object.";

/// Render every picklist with its `label → code` pairs and dependency
pub fn format_report(schema: &NormalizedPicklistSchema) -> String {
    if schema.is_empty() {
        return NO_PICKLISTS.to_string();
    }

    let mut sections = Vec::with_capacity(schema.len());
    for (name, field) in schema.iter() {
        let mut lines = vec![format!("{} ({}):", name, field.kind.as_str())];

        if field.values.is_empty() {
            lines.push("  (No values available)".to_string());
        }
        for pv in &field.values {
            let inactive = if pv.active { "" } else { " [INACTIVE]" };
            lines.push(format!("  - {} → {}{}", pv.label, pv.value, inactive));
        }

        if let Some(controller) = field.controller() {
            lines.push(format!("  Dependencies: controlled by {}", controller));
        }
        sections.push(lines.join("\n"));
    }

    sections.join("\n\n")
}
