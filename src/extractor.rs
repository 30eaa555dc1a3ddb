use crate::types::{AttributeDetail, AttributeSet, RawPayload, TripletScheme};

/// Collect the numbered triplets of `scheme` from `payload`.
///
/// Scanning starts at index 1 and stops at the first index where any of
/// the three keys is missing or not a string. Later indices are never
/// looked at, so a gap truncates the result even if valid triplets
/// follow it.
pub fn extract_details(payload: &RawPayload, scheme: &TripletScheme) -> AttributeSet {
    let mut details = AttributeSet::new();

    for index in 1.. {
        let (name_key, value_key, type_key) = scheme.keys(index);

        let name = payload.get(&name_key).and_then(|v| v.as_str());
        let value = payload.get(&value_key).and_then(|v| v.as_str());
        let kind = payload.get(&type_key).and_then(|v| v.as_str());

        let (Some(name), Some(value), Some(kind)) = (name, value, kind) else {
            break;
        };

        details.insert(name.to_string(), AttributeDetail::new(value, kind));
    }

    details
}

pub fn extract_attributes(payload: &RawPayload) -> AttributeSet {
    extract_details(payload, &TripletScheme::ATTRIBUTES)
}

pub fn extract_user_traits(payload: &RawPayload) -> AttributeSet {
    extract_details(payload, &TripletScheme::USER_TRAITS)
}
