use serde_json::{Map, Value};

/// Nested string-keyed parameter mapping.
pub type Conditions = Map<String, Value>;

/// Value at `segments` inside nested objects.
pub fn get_path<'a>(conditions: &'a Conditions, segments: &[String]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = conditions.get(first)?;
    for segment in rest {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Writes `value` at `segments`, creating or replacing intermediate objects.
/// An empty path is a no-op.
pub fn set_path(conditions: &mut Conditions, segments: &[String], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = conditions;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            return;
        };
        current = next;
    }
    current.insert(last.clone(), value);
}

/// Numeric field of `conditions`, or `default` when absent.
pub(crate) fn number_or(conditions: &Conditions, key: &str, default: f64) -> Option<f64> {
    match conditions.get(key) {
        None | Some(Value::Null) => Some(default),
        Some(value) => value.as_f64(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn set_creates_intermediate_maps() {
        let mut conditions = Conditions::new();
        set_path(&mut conditions, &path(&["mineral_spec", "Fayalite"]), json!(0.2));
        assert_eq!(
            get_path(&conditions, &path(&["mineral_spec", "Fayalite"])),
            Some(&json!(0.2))
        );
    }

    #[test]
    fn set_replaces_scalar_parents() {
        let mut conditions = Conditions::new();
        conditions.insert("mineral_spec".into(), json!(0.5));
        set_path(&mut conditions, &path(&["mineral_spec", "Forsterite"]), json!(0.9));
        assert_eq!(conditions["mineral_spec"], json!({"Forsterite": 0.9}));
    }

    #[test]
    fn get_missing_is_none() {
        let conditions = json!({"a": {"b": 1}}).as_object().cloned().unwrap();
        assert!(get_path(&conditions, &path(&["a", "c"])).is_none());
        assert!(get_path(&conditions, &path(&["a", "b", "c"])).is_none());
        assert!(get_path(&conditions, &[]).is_none());
    }
}
