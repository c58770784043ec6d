/// Compacts a transport error string before it enters an error value or a log line.
///
/// Provider errors routinely embed the full JSON response body after a `text:`
/// marker and, when lifted through anyhow at the edges, a captured backtrace.
/// Neither belongs in a check report.
pub fn compact_error_message(message: &str, max_len: usize) -> String {
    let mut raw = message;
    if let Some((prefix, _)) = raw.split_once("Stack backtrace:") {
        raw = prefix;
    }
    let elided;
    if let Some((prefix, _)) = raw.split_once(" text: ") {
        elided = format!("{prefix} text=<omitted>");
        raw = &elided;
    }

    let mut compact = String::with_capacity(raw.len().min(max_len + 16));
    let mut prev_ws = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !prev_ws && !compact.is_empty() {
                compact.push(' ');
            }
            prev_ws = true;
            continue;
        }
        compact.push(ch);
        prev_ws = false;
        if compact.len() > max_len {
            break;
        }
    }
    while compact.ends_with(' ') {
        compact.pop();
    }
    if compact.len() > max_len {
        compact.truncate(max_len);
        compact.push_str("...(truncated)");
    }
    compact
}
