use bson::{doc, oid::ObjectId, Bson, Document};

use crate::model::booking::BOOKING_STATUS_NEW;
use crate::model::garage::Garage;

/// Resolves which unassigned marketplace records belong to a garage.
///
/// Matching is two-tier: an exact match on the external place id, and a
/// case-insensitive literal match on the free-text garage name that is only
/// consulted when a record carries no place id at all. A garage with neither
/// linkage key matches nothing — an empty result, not an error.
#[derive(Debug, Clone)]
pub struct GarageMatcher {
    garage_id: ObjectId,
    linked_place_id: Option<String>,
    linked_name: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

impl GarageMatcher {
    pub fn new(garage: &Garage, garage_id: ObjectId) -> Self {
        GarageMatcher {
            garage_id,
            linked_place_id: non_empty(garage.linked_garage_place_id.as_deref()),
            linked_name: non_empty(garage.linked_garage_name.as_deref()),
        }
    }

    pub fn has_linkage(&self) -> bool {
        self.linked_place_id.is_some() || self.linked_name.is_some()
    }

    /// The "matches me" branches of the visibility condition, one document
    /// per linkage key. Empty when the garage has no linkage.
    fn match_branches(&self) -> Vec<Document> {
        let mut branches = Vec::new();
        if let Some(ref place_id) = self.linked_place_id {
            branches.push(doc! { "garagePlaceId": place_id.as_str() });
        }
        if let Some(ref name) = self.linked_name {
            // The linked name is data, not a pattern: escape it and anchor
            // the whole string, matching case-insensitively.
            let pattern = format!("^{}$", regex::escape(name));
            branches.push(doc! {
                "$and": [
                    { "$or": [ { "garagePlaceId": Bson::Null }, { "garagePlaceId": "" } ] },
                    { "garageName": Bson::RegularExpression(bson::Regex {
                        pattern,
                        options: "i".to_string(),
                    }) },
                ]
            });
        }
        branches
    }

    /// Filter for unassigned new records that match this garage, or `None`
    /// when the garage has no linkage and the query can be skipped.
    pub fn new_business_filter(&self) -> Option<Document> {
        let branches = self.match_branches();
        if branches.is_empty() {
            return None;
        }
        Some(doc! {
            "assignedGarageId": Bson::Null,
            "garageStatus": BOOKING_STATUS_NEW,
            "$or": branches,
        })
    }

    /// Translate a status filter into one booking query:
    /// - `None`/`"all"`: assigned to me (any status) OR unassigned new
    ///   matching me,
    /// - `"new"`: unassigned matching records only (`None` result means skip
    ///   the query and return an empty page),
    /// - any other status: records assigned to me with exactly that status.
    pub fn booking_filter(&self, status: Option<&str>) -> Option<Document> {
        match status {
            None | Some("all") => {
                let assigned = doc! { "assignedGarageId": self.garage_id };
                match self.new_business_filter() {
                    Some(new_business) => Some(doc! { "$or": [assigned, new_business] }),
                    None => Some(assigned),
                }
            }
            Some(BOOKING_STATUS_NEW) => self.new_business_filter(),
            Some(concrete) => Some(doc! {
                "assignedGarageId": self.garage_id,
                "garageStatus": concrete,
            }),
        }
    }

    /// Visibility filter for open quote requests: untargeted requests are
    /// open to every garage; targeted ones follow the matching rules.
    pub fn quote_request_filter(&self) -> Document {
        let untargeted = doc! {
            "$and": [
                { "$or": [ { "garagePlaceId": Bson::Null }, { "garagePlaceId": "" } ] },
                { "$or": [ { "garageName": Bson::Null }, { "garageName": "" } ] },
            ]
        };
        let mut branches = vec![untargeted];
        branches.extend(self.match_branches());
        doc! { "$or": branches }
    }

    /// Pure form of the unassigned-record matching rules, for in-process
    /// decisions (e.g. claim checks) without a round trip.
    pub fn matches_record(&self, record_place_id: Option<&str>, record_name: Option<&str>) -> bool {
        let record_place = record_place_id.map(str::trim).filter(|s| !s.is_empty());

        if let (Some(linked), Some(place)) = (self.linked_place_id.as_deref(), record_place) {
            if place == linked {
                return true;
            }
        }

        // Name fallback applies only when the record has no place id.
        if record_place.is_none() {
            if let (Some(linked), Some(name)) = (self.linked_name.as_deref(), record_name) {
                let name = name.trim();
                return !name.is_empty() && name.to_lowercase() == linked.to_lowercase();
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::garage::GARAGE_STATUS_APPROVED;

    fn garage(place_id: Option<&str>, name: Option<&str>) -> (Garage, ObjectId) {
        let id = ObjectId::new();
        let garage = Garage {
            id: Some(id),
            user_id: ObjectId::new(),
            name: "Test Garage".to_string(),
            email: "garage@example.com".to_string(),
            phone: "0123456789".to_string(),
            status: GARAGE_STATUS_APPROVED.to_string(),
            linked_garage_place_id: place_id.map(String::from),
            linked_garage_name: name.map(String::from),
            created_at: None,
            updated_at: None,
        };
        (garage, id)
    }

    #[test]
    fn test_place_id_match_is_exact() {
        let (g, id) = garage(Some("place-123"), None);
        let matcher = GarageMatcher::new(&g, id);
        assert!(matcher.matches_record(Some("place-123"), None));
        assert!(!matcher.matches_record(Some("place-124"), None));
        assert!(!matcher.matches_record(Some("PLACE-123"), None));
    }

    #[test]
    fn test_name_fallback_only_without_place_id() {
        let (g, id) = garage(None, Some("Joe's Auto (West)"));
        let matcher = GarageMatcher::new(&g, id);
        // No place id on the record: name matching applies, case-insensitive
        assert!(matcher.matches_record(None, Some("joe's auto (west)")));
        assert!(matcher.matches_record(Some(""), Some("JOE'S AUTO (WEST)")));
        // Record has a place id: the fallback must not be consulted
        assert!(!matcher.matches_record(Some("some-place"), Some("Joe's Auto (West)")));
        // Different name
        assert!(!matcher.matches_record(None, Some("Joe's Auto (East)")));
    }

    #[test]
    fn test_name_with_regex_metacharacters_is_literal() {
        let (g, id) = garage(None, Some("A+ Motors [24/7]"));
        let matcher = GarageMatcher::new(&g, id);
        assert!(matcher.matches_record(None, Some("a+ motors [24/7]")));
        // "A Motors 24/7" would match if '+' and brackets were treated as a
        // pattern instead of literal characters
        assert!(!matcher.matches_record(None, Some("A Motors 24/7")));

        let filter = matcher.new_business_filter().unwrap();
        let branches = filter.get_array("$or").unwrap();
        let name_branch = branches[0].as_document().unwrap();
        let and = name_branch.get_array("$and").unwrap();
        let regex = match and[1].as_document().unwrap().get("garageName").unwrap() {
            Bson::RegularExpression(r) => r,
            other => panic!("expected a regex condition, got {:?}", other),
        };
        assert_eq!(regex.pattern, r"^A\+ Motors \[24/7\]$");
        assert_eq!(regex.options, "i");
    }

    #[test]
    fn test_no_linkage_matches_nothing() {
        let (g, id) = garage(None, None);
        let matcher = GarageMatcher::new(&g, id);
        assert!(!matcher.has_linkage());
        assert!(!matcher.matches_record(None, Some("Anything")));
        assert!(matcher.new_business_filter().is_none());
        assert!(matcher.booking_filter(Some("new")).is_none());
    }

    #[test]
    fn test_empty_linkage_strings_are_ignored() {
        let (g, id) = garage(Some(""), Some("  "));
        let matcher = GarageMatcher::new(&g, id);
        assert!(!matcher.has_linkage());
        assert!(!matcher.matches_record(Some(""), Some("  ")));
    }

    #[test]
    fn test_booking_filter_all_is_assigned_or_new_business() {
        let (g, id) = garage(Some("place-123"), None);
        let matcher = GarageMatcher::new(&g, id);
        let filter = matcher.booking_filter(None).unwrap();
        let branches = filter.get_array("$or").unwrap();
        assert_eq!(branches.len(), 2);
        let assigned = branches[0].as_document().unwrap();
        assert_eq!(assigned.get_object_id("assignedGarageId").unwrap(), id);
        let new_business = branches[1].as_document().unwrap();
        assert_eq!(new_business.get_str("garageStatus").unwrap(), "new");
    }

    #[test]
    fn test_booking_filter_all_without_linkage_is_assigned_only() {
        let (g, id) = garage(None, None);
        let matcher = GarageMatcher::new(&g, id);
        let filter = matcher.booking_filter(Some("all")).unwrap();
        assert_eq!(filter.get_object_id("assignedGarageId").unwrap(), id);
        assert!(filter.get("$or").is_none());
    }

    #[test]
    fn test_booking_filter_concrete_status_excludes_unassigned() {
        let (g, id) = garage(Some("place-123"), Some("Joe's"));
        let matcher = GarageMatcher::new(&g, id);
        let filter = matcher.booking_filter(Some("completed")).unwrap();
        assert_eq!(filter.get_object_id("assignedGarageId").unwrap(), id);
        assert_eq!(filter.get_str("garageStatus").unwrap(), "completed");
        assert!(filter.get("$or").is_none());
    }

    #[test]
    fn test_quote_request_filter_includes_untargeted_branch() {
        let (g, id) = garage(Some("place-123"), None);
        let matcher = GarageMatcher::new(&g, id);
        let filter = matcher.quote_request_filter();
        let branches = filter.get_array("$or").unwrap();
        // untargeted branch + place-id branch
        assert_eq!(branches.len(), 2);

        let (g2, id2) = garage(None, None);
        let matcher2 = GarageMatcher::new(&g2, id2);
        let branches2 = matcher2.quote_request_filter();
        assert_eq!(branches2.get_array("$or").unwrap().len(), 1);
    }
}
