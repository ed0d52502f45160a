use reqwest::blocking::Client;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/words.txt");

const APP_DIR: &str = "wordle-assistant";
const WORDLIST_FILE: &str = "words.txt";
const FETCH_TIMEOUT_SECS: u64 = 15;
const WORD_TAG_OPEN: &str = "<span itemprop=\"name\">";
const WORD_TAG_CLOSE: &str = "</span>";

/// Where the valid-word list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordSource {
    /// No validity filtering; suggestions stay unranked.
    Disabled,
    Embedded,
    File(PathBuf),
    /// A word-list page fetched over HTTP.
    Url(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(reqwest::StatusCode),
}

fn normalize_word(line: &str, word_length: usize) -> Option<String> {
    let word = line.trim().to_lowercase();
    (word.chars().count() == word_length && word.chars().all(|c| c.is_ascii_alphabetic()))
        .then_some(word)
}

pub fn load_wordbank_from_str(data: &str, word_length: usize) -> HashSet<String> {
    data.lines()
        .filter_map(|line| normalize_word(line, word_length))
        .collect()
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(
    path: P,
    word_length: usize,
) -> io::Result<HashSet<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut words = HashSet::new();
    for line in reader.lines() {
        if let Some(word) = normalize_word(&line?, word_length) {
            words.insert(word);
        }
    }
    Ok(words)
}

/// Meaningpedia page listing every English word of `word_length` letters.
#[must_use]
pub fn online_wordlist_url(word_length: usize) -> String {
    format!("https://meaningpedia.com/{word_length}-letter-words?show=all")
}

/// Words tagged `<span itemprop="name">` in a word-list page.
#[must_use]
pub fn extract_words_from_page(page: &str, word_length: usize) -> HashSet<String> {
    page.split(WORD_TAG_OPEN)
        .skip(1)
        .filter_map(|rest| rest.split_once(WORD_TAG_CLOSE))
        .filter_map(|(word, _)| normalize_word(word, word_length))
        .collect()
}

pub fn fetch_wordbank(url: &str, word_length: usize) -> Result<HashSet<String>, FetchError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()?;
    fetch_wordbank_with(&client, url, word_length)
}

pub fn fetch_wordbank_with(
    client: &Client,
    url: &str,
    word_length: usize,
) -> Result<HashSet<String>, FetchError> {
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    let page = response.text()?;
    Ok(extract_words_from_page(&page, word_length))
}

/// `<data dir>/wordle-assistant/words.txt`, if the platform has a data dir.
#[must_use]
pub fn get_wordlist_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join(WORDLIST_FILE))
}

/// The user's word list when one is installed, then the online list when
/// `fetch` is set, the embedded list otherwise.
#[must_use]
pub fn default_word_source(word_length: usize, fetch: bool) -> WordSource {
    match get_wordlist_path() {
        Some(path) if path.is_file() => WordSource::File(path),
        _ if fetch => WordSource::Url(online_wordlist_url(word_length)),
        _ => WordSource::Embedded,
    }
}

/// Loads the valid-word set; an unreadable source yields an empty set.
pub fn load_valid_words(source: &WordSource, word_length: usize) -> HashSet<String> {
    let words = match source {
        WordSource::Disabled => {
            log::info!("Word list disabled; suggestions will not be ranked");
            return HashSet::new();
        }
        WordSource::Embedded => load_wordbank_from_str(EMBEDDED_WORDBANK, word_length),
        WordSource::File(path) => match load_wordbank_from_file(path, word_length) {
            Ok(words) => words,
            Err(e) => {
                log::warn!(
                    "Failed to load word list from '{}': {e}; continuing without one",
                    path.display()
                );
                return HashSet::new();
            }
        },
        WordSource::Url(url) => {
            log::info!("Fetching word list from {url}");
            match fetch_wordbank(url, word_length) {
                Ok(words) => words,
                Err(e) => {
                    log::warn!("Failed to fetch word list from '{url}': {e}; continuing without one");
                    return HashSet::new();
                }
            }
        }
    };
    if words.is_empty() {
        log::warn!("No {word_length}-letter words in {source:?}; suggestions will not be ranked");
    } else {
        log::info!("Loaded {} {word_length}-letter words", words.len());
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answers a single HTTP request with `response` and returns its URL.
    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = [0u8; 4096];
                let _ = stream.read(&mut request);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/5-letter-words?show=all")
    }

    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    const PAGE: &str = r#"<ul>
<li><span itemprop="name">Crane</span></li>
<li><span itemprop="name">slate</span></li>
<li><span itemprop="name">cranes</span></li>
<li><span class="other">ghost</span></li>
</ul>"#;

    #[test]
    fn test_load_wordbank_from_str_filters_length_and_letters() {
        let data = "Crane\n slate \nraise\ncranes\ncr4ne\n\nabc";
        let words = load_wordbank_from_str(data, 5);
        assert_eq!(words.len(), 3);
        assert!(words.contains("crane"));
        assert!(words.contains("slate"));
        assert!(!words.contains("cranes"));

        let short = load_wordbank_from_str(data, 3);
        assert_eq!(short.len(), 1);
        assert!(short.contains("abc"));
    }

    #[test]
    fn test_load_wordbank_deduplicates() {
        let words = load_wordbank_from_str("crane\nCRANE\n crane", 5);
        assert_eq!(words.len(), 1);
    }

    #[test]
    fn test_embedded_wordbank_has_five_letter_words() {
        let words = load_wordbank_from_str(EMBEDDED_WORDBANK, 5);
        assert!(words.len() > 100);
        assert!(words.contains("crane"));
        assert!(words.iter().all(|w| w.len() == 5));
    }

    #[test]
    fn test_load_wordbank_from_file() {
        let path = std::env::temp_dir().join("wordle_assistant_wordbank_test.txt");
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "apple").unwrap();
            writeln!(file, "GRAPE").unwrap();
            writeln!(file, "kiwi").unwrap();
        }
        let words = load_wordbank_from_file(&path, 5).unwrap();
        assert_eq!(words.len(), 2);
        assert!(words.contains("grape"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_degrades_to_empty_set() {
        let source = WordSource::File(PathBuf::from("/nonexistent/wordle/words.txt"));
        assert!(load_wordbank_from_file("/nonexistent/wordle/words.txt", 5).is_err());
        assert!(load_valid_words(&source, 5).is_empty());
    }

    #[test]
    fn test_disabled_source_is_empty() {
        assert!(load_valid_words(&WordSource::Disabled, 5).is_empty());
        assert!(!load_valid_words(&WordSource::Embedded, 5).is_empty());
    }

    #[test]
    fn test_extract_words_from_page() {
        let words = extract_words_from_page(PAGE, 5);
        assert_eq!(words.len(), 2);
        assert!(words.contains("crane"));
        assert!(words.contains("slate"));
        assert!(!words.contains("ghost"));
        assert!(extract_words_from_page("no tags here", 5).is_empty());
    }

    #[test]
    fn test_online_wordlist_url_uses_word_length() {
        assert_eq!(
            online_wordlist_url(6),
            "https://meaningpedia.com/6-letter-words?show=all"
        );
    }

    #[test]
    fn test_fetch_wordbank_reads_page() {
        let url = serve_once(http_response("200 OK", PAGE));
        let words = fetch_wordbank_with(&local_client(), &url, 5).unwrap();
        assert_eq!(words.len(), 2);
        assert!(words.contains("crane"));
    }

    #[test]
    fn test_fetch_wordbank_rejects_error_status() {
        let url = serve_once(http_response("404 Not Found", ""));
        match fetch_wordbank_with(&local_client(), &url, 5) {
            Err(FetchError::Status(status)) => assert_eq!(status.as_u16(), 404),
            other => panic!("Expected a status error, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_fetch_degrades_to_empty_set() {
        let url = serve_once(http_response("500 Internal Server Error", ""));
        assert!(load_valid_words(&WordSource::Url(url), 5).is_empty());

        // Nothing listens on a port whose listener was dropped.
        let closed = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = closed.local_addr().unwrap();
        drop(closed);
        let url = format!("http://{addr}/");
        assert!(matches!(
            fetch_wordbank_with(&local_client(), &url, 5),
            Err(FetchError::Request(_))
        ));
        assert!(load_valid_words(&WordSource::Url(url), 5).is_empty());
    }
}
