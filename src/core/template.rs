//! Positional `{}` placeholder substitution
//!
//! Markers are replaced left to right with the supplied arguments. Markers
//! without a matching argument stay in the output as literal `{}`; arguments
//! beyond the marker count are ignored.

const MARKER: &str = "{}";

/// Substitute `{}` markers in `template` with `args`, in order
///
/// # Examples
///
/// ```
/// use interlaced_logger::core::template::substitute;
///
/// let out = substitute("User {} logged in from {}", &["john", "10.0.0.1"]);
/// assert_eq!(out, "User john logged in from 10.0.0.1");
///
/// // Missing arguments leave the marker in place
/// assert_eq!(substitute("{} and {}", &["a"]), "a and {}");
/// ```
pub fn substitute<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    let extra: usize = args.iter().map(|a| a.as_ref().len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;
    let mut args = args.iter();

    while let Some(pos) = rest.find(MARKER) {
        let Some(arg) = args.next() else {
            break;
        };
        out.push_str(&rest[..pos]);
        out.push_str(arg.as_ref());
        rest = &rest[pos + MARKER.len()..];
    }

    out.push_str(rest);
    out
}
