pub mod booking_dto;
pub mod garage_dto;
pub mod quote_dto;
pub mod slot_dto;

use std::collections::BTreeMap;

/// Flatten `validator` output into a field → message map, the shape the UI
/// uses to annotate individual inputs. Keys are converted to the camelCase
/// names the wire format uses.
pub fn validation_errors_to_map(errors: &validator::ValidationErrors) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for (field, field_errors) in errors.field_errors() {
        if let Some(first) = field_errors.first() {
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for {}", field));
            map.insert(to_camel_case(field), message);
        }
    }
    map
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 2, message = "Name is too short"))]
        name: String,
        #[validate(email(message = "Invalid email address"))]
        email: String,
    }

    #[test]
    fn test_errors_flatten_to_field_map() {
        let probe = Probe {
            name: "x".to_string(),
            email: "nope".to_string(),
        };
        let errors = probe.validate().unwrap_err();
        let map = validation_errors_to_map(&errors);
        assert_eq!(map.get("name").map(String::as_str), Some("Name is too short"));
        assert_eq!(
            map.get("email").map(String::as_str),
            Some("Invalid email address")
        );
    }

    #[test]
    fn test_valid_input_produces_no_errors() {
        let probe = Probe {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
        };
        assert!(probe.validate().is_ok());
    }

    #[test]
    fn test_field_names_are_camel_cased() {
        assert_eq!(to_camel_case("customer_name"), "customerName");
        assert_eq!(to_camel_case("price"), "price");
        assert_eq!(to_camel_case("linked_garage_place_id"), "linkedGaragePlaceId");
    }
}
