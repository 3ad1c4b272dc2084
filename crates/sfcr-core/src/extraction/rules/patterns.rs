//! Common regex patterns and fragments for SFCR answer extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Literal marker the service writes when a value is not available.
pub const NOT_AVAILABLE: &str = "Non disponible";

/// Horizontal whitespace (regular, no-break and narrow no-break spaces, tabs).
pub const HSPACE: &str = r"[\t\p{Zs}]";

/// Numeral body: digits, thousands spaces, comma or period separators.
pub const NUMERAL: &str = r"[0-9,.\t\p{Zs}]+";

/// Optional leading minus sign (ASCII hyphen or Unicode minus).
pub const SIGN: &str = r"[-−]?";

/// Currency markers closing a strict currency answer.
pub const CURRENCY_MARKERS: &str = r"(?:Md€|M€|€|Non disponible)";

/// Markers closing a strict percentage answer.
pub const PERCENT_MARKERS: &str = r"(?:%|Non disponible)";

/// Explicit billion markers.
pub const BILLION_MARKERS: &str = r"(?:Md€|milliards?)";

/// Explicit million markers.
pub const MILLION_MARKERS: &str = r"(?:M€|millions?)";

lazy_static! {
    // Unit detection inside a matched context
    pub static ref BILLION_MARKER: Regex = Regex::new(
        r"(?i)Md€|milliard"
    ).unwrap();

    pub static ref MILLION_MARKER: Regex = Regex::new(
        r"(?i)M€|million"
    ).unwrap();

    // Separately reported own-funds components of "capital et primes"
    pub static ref SHARE_CAPITAL: Regex = Regex::new(
        r"(?i)capital\s+social[^:\n]*:\s*([0-9][0-9,.\t\p{Zs}]*)(?:Md€|milliards?|M€|millions?|€)"
    ).unwrap();

    pub static ref SHARE_PREMIUM: Regex = Regex::new(
        r"(?i)primes?\s+d['’]émission[^:\n]*:\s*([0-9][0-9,.\t\p{Zs}]*)(?:Md€|milliards?|M€|millions?|€)"
    ).unwrap();
}
