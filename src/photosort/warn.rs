fn sanitize_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if !out.is_empty() && !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else if !ch.is_control() {
            out.push(ch);
            prev_sep = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "na".to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WarnEvent<'a> {
    pub code: &'a str,
    pub stage: &'a str,
    pub action: &'a str,
    pub path: &'a str,
    pub reason: &'a str,
}

pub fn format_event(event: &WarnEvent<'_>) -> String {
    format!(
        "PHOTOSORT_WARN code={} stage={} action={} path={} reason={}",
        sanitize_value(event.code),
        sanitize_value(event.stage),
        sanitize_value(event.action),
        sanitize_value(event.path),
        sanitize_value(event.reason),
    )
}

pub fn emit(event: WarnEvent<'_>) {
    eprintln!("{}", format_event(&event));
}

#[cfg(test)]
mod tests {
    use super::{WarnEvent, format_event, sanitize_value};

    #[test]
    fn sanitize_value_rewrites_whitespace() {
        assert_eq!(sanitize_value("a b\tc"), "a_b_c");
    }

    #[test]
    fn sanitize_value_falls_back_for_empty() {
        assert_eq!(sanitize_value("   "), "na");
    }

    #[test]
    fn format_event_keeps_paths_on_one_line() {
        let line = format_event(&WarnEvent {
            code: "SKIPPED_EXISTING",
            stage: "execute",
            action: "skip",
            path: "/out/2024/2024-03-01 Trip/IMG_0001.JPG",
            reason: "",
        });
        assert_eq!(
            line,
            "PHOTOSORT_WARN code=SKIPPED_EXISTING stage=execute action=skip \
             path=/out/2024/2024-03-01_Trip/IMG_0001.JPG reason=na"
        );
    }
}
