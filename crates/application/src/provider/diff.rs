use oig_core::HostValue;

/// Names the top-level attributes whose planned value differs from state.
///
/// Planned unknowns match any stored value, at any depth, and `ignored`
/// attributes are skipped. Names come back sorted.
#[must_use]
pub fn changed_attributes(plan: &HostValue, state: &HostValue, ignored: &[&str]) -> Vec<String> {
    let (HostValue::Object(planned), HostValue::Object(stored)) = (plan, state) else {
        return Vec::new();
    };

    planned
        .iter()
        .filter(|(name, _)| !ignored.contains(&name.as_str()))
        .filter(|(name, value)| {
            !plan_matches(value, stored.get(name.as_str()).unwrap_or(&HostValue::Null))
        })
        .map(|(name, _)| name.clone())
        .collect()
}

fn plan_matches(plan: &HostValue, state: &HostValue) -> bool {
    match (plan, state) {
        (HostValue::Unknown, _) => true,
        (HostValue::Object(planned), HostValue::Object(stored)) => {
            planned.iter().all(|(name, value)| {
                plan_matches(value, stored.get(name).unwrap_or(&HostValue::Null))
            }) && stored
                .iter()
                .filter(|(name, _)| !planned.contains_key(name.as_str()))
                .all(|(_, value)| value.is_null())
        }
        (HostValue::List(planned), HostValue::List(stored)) => {
            planned.len() == stored.len()
                && planned
                    .iter()
                    .zip(stored)
                    .all(|(plan, state)| plan_matches(plan, state))
        }
        (HostValue::Set(planned), HostValue::Set(stored)) => {
            planned.len() == stored.len()
                && planned
                    .iter()
                    .all(|plan| stored.iter().any(|state| plan_matches(plan, state)))
        }
        (plan, state) => plan == state,
    }
}
