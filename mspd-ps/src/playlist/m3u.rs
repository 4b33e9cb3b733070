//! Extract urls from M3U playlist files
//!
//! M3U(8) is a de-facto standard: every line that does not start with `#` is
//! an entry. Entries are further split on whitespace so that servers which
//! put several URLs on one line still yield each of them.

/// Extract stream URLs from an M3U document, in order
pub fn parse(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_url_per_line() {
        assert_eq!(parse("A\nB\n"), vec!["A", "B"]);
    }

    #[test]
    fn test_extended_header_and_comments_skipped() {
        let playlist = "#EXTM3U\n\
                        #EXTINF:-1,Station - Live Stream\n\
                        http://a.example/stream.mp3\n\
                        \n\
                        # mirror\n\
                        http://b.example/stream.mp3\n";
        assert_eq!(
            parse(playlist),
            vec!["http://a.example/stream.mp3", "http://b.example/stream.mp3"]
        );
    }

    #[test]
    fn test_crlf_and_whitespace_separated_entries() {
        assert_eq!(parse("A B\r\n\tC\r\n"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_empty_document() {
        assert!(parse("").is_empty());
        assert!(parse("#EXTM3U\n").is_empty());
    }
}
