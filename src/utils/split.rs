/// Flattens repeatable, possibly comma-separated flag values.
///
/// `["a, b", "c"]` becomes `["a", "b", "c"]`; blank pieces are dropped.
pub fn split_csv(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
