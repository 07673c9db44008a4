//! Selectable currency codes.

/// Denomination in satoshis. Always offered first.
pub const SATS: &str = "sat";

/// Fiat code always offered after [`SATS`].
pub const USD: &str = "USD";

/// Build the list of currencies offered for a device.
///
/// The result always starts with `sat` and `USD`, followed by the codes the
/// server reported in server order. Repeated codes keep their first position.
///
/// # Examples
///
/// ```
/// use lnpos_types::selectable_currencies;
///
/// let server = vec!["EUR".to_string(), "GBP".to_string()];
/// assert_eq!(selectable_currencies(&server), ["sat", "USD", "EUR", "GBP"]);
/// ```
#[must_use]
pub fn selectable_currencies(server: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(server.len() + 2);
    for code in [SATS, USD]
        .into_iter()
        .chain(server.iter().map(String::as_str))
    {
        if !out.iter().any(|c| c == code) {
            out.push(code.to_string());
        }
    }
    out
}
