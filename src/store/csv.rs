//! CSV import: `hostname[,label]` per line, optional header row.

use super::SavedHost;

/// Parse CSV host definitions.
///
/// Lines are split on any newline convention; blank lines are dropped and
/// fields are trimmed. A line whose first field is empty is skipped, as is
/// a header row whose first field starts with "host" (case-insensitive).
/// A missing label defaults to the hostname. Output preserves input order.
pub fn parse_csv(contents: &str) -> Vec<SavedHost> {
    let mut hosts = Vec::new();

    for line in contents.split(['\n', '\r']) {
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split(',').map(str::trim);
        let hostname = match fields.next() {
            Some(h) if !h.is_empty() && !h.to_lowercase().starts_with("host") => h,
            _ => continue,
        };
        let label = fields.next().unwrap_or(hostname);

        hosts.push(SavedHost {
            hostname: hostname.to_string(),
            label: label.to_string(),
        });
    }

    hosts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(hostname: &str, label: &str) -> SavedHost {
        SavedHost {
            hostname: hostname.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_parse_csv_with_header_blank_and_missing_label() {
        let input = "host,label\n8.8.8.8,Google\n,Empty\n1.1.1.1\n";
        assert_eq!(
            parse_csv(input),
            vec![host("8.8.8.8", "Google"), host("1.1.1.1", "1.1.1.1")]
        );
    }

    #[test]
    fn test_parse_csv_header_detection_is_case_insensitive() {
        let input = "Hostname,Label\nHOST,x\n10.0.0.1,a\n";
        assert_eq!(parse_csv(input), vec![host("10.0.0.1", "a")]);
    }

    #[test]
    fn test_parse_csv_trims_fields() {
        let input = "  8.8.8.8 ,  Google DNS \n";
        assert_eq!(parse_csv(input), vec![host("8.8.8.8", "Google DNS")]);
    }

    #[test]
    fn test_parse_csv_handles_crlf_and_blank_lines() {
        let input = "8.8.8.8,Google\r\n\r\n   \r\n1.1.1.1,Cloudflare\r\n";
        assert_eq!(
            parse_csv(input),
            vec![host("8.8.8.8", "Google"), host("1.1.1.1", "Cloudflare")]
        );
    }

    #[test]
    fn test_parse_csv_extra_columns_ignored() {
        let input = "8.8.8.8,Google,extra,columns\n";
        assert_eq!(parse_csv(input), vec![host("8.8.8.8", "Google")]);
    }

    #[test]
    fn test_parse_csv_empty_input() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("\n\n\n").is_empty());
    }

    #[test]
    fn test_parse_csv_preserves_order() {
        let input = "c.example,C\na.example,A\nb.example,B\n";
        let parsed = parse_csv(input);
        let names: Vec<&str> = parsed.iter().map(|h| h.hostname.as_str()).collect();
        assert_eq!(names, vec!["c.example", "a.example", "b.example"]);
    }
}
