use crate::http::{Fetch, FetchError};
use pokedex_common::{parse_card_search, CardCandidate};

/// 1ページで取得する候補数（APIの上限）
pub const PAGE_SIZE: u32 = 250;

/// 検索条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardQuery {
    ByNumber(u32),
    ByName(String),
}

impl CardQuery {
    /// `q` パラメータの値
    ///
    /// 空白を含む名前は引用符で囲む（例: `name:"mr. mime"`）。
    pub fn to_filter(&self) -> String {
        match self {
            CardQuery::ByNumber(id) => format!("nationalPokedexNumbers:{}", id),
            CardQuery::ByName(name) if name.chars().any(char::is_whitespace) => {
                format!("name:\"{}\"", name.replace('"', ""))
            }
            CardQuery::ByName(name) => format!("name:{}", name),
        }
    }
}

/// カード検索の取得元
pub trait CardSource {
    fn search(&self, query: &CardQuery) -> Result<Vec<CardCandidate>, FetchError>;
}

impl<T: CardSource + ?Sized> CardSource for &T {
    fn search(&self, query: &CardQuery) -> Result<Vec<CardCandidate>, FetchError> {
        (**self).search(query)
    }
}

/// api.pokemontcg.io クライアント
pub struct TcgApiClient<F> {
    fetch: F,
    base_url: String,
}

impl<F: Fetch> TcgApiClient<F> {
    pub fn new(fetch: F, base_url: impl Into<String>) -> Self {
        Self {
            fetch,
            base_url: base_url.into(),
        }
    }
}

impl<F: Fetch> CardSource for TcgApiClient<F> {
    fn search(&self, query: &CardQuery) -> Result<Vec<CardCandidate>, FetchError> {
        let filter = query.to_filter();
        let page_size = PAGE_SIZE.to_string();
        let body = self
            .fetch
            .get_text(&self.base_url, &[("q", filter.as_str()), ("pageSize", page_size.as_str())])?;

        parse_card_search(&body).map_err(|e| FetchError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct RecordingFetch {
        body: String,
        calls: RefCell<Vec<(String, Vec<(String, String)>)>>,
    }

    impl Fetch for RecordingFetch {
        fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, FetchError> {
            self.calls.borrow_mut().push((
                url.to_string(),
                query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ));
            Ok(self.body.clone())
        }

        fn get_bytes(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            unreachable!()
        }
    }

    #[test]
    fn test_to_filter() {
        assert_eq!(CardQuery::ByNumber(25).to_filter(), "nationalPokedexNumbers:25");
        assert_eq!(CardQuery::ByName("pikachu".into()).to_filter(), "name:pikachu");
        assert_eq!(CardQuery::ByName("mr. mime".into()).to_filter(), "name:\"mr. mime\"");
        assert_eq!(CardQuery::ByName("farfetch'd".into()).to_filter(), "name:farfetch'd");
    }

    #[test]
    fn test_search_sends_filter_and_page_size() {
        let fetch = RecordingFetch {
            body: r#"{"data": [{"name": "Pikachu", "rarity": "Common", "images": {"small": "S"}}]}"#.into(),
            calls: RefCell::new(Vec::new()),
        };
        let client = TcgApiClient::new(&fetch, "https://api.pokemontcg.io/v2/cards");

        let cards = client.search(&CardQuery::ByNumber(25)).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].image_reference(), Some("S"));

        let calls = fetch.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "https://api.pokemontcg.io/v2/cards");
        assert_eq!(
            calls[0].1,
            vec![
                ("q".to_string(), "nationalPokedexNumbers:25".to_string()),
                ("pageSize".to_string(), "250".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_invalid_body() {
        let fetch = RecordingFetch {
            body: "<html>Service Unavailable</html>".into(),
            calls: RefCell::new(Vec::new()),
        };
        let client = TcgApiClient::new(&fetch, "https://api.pokemontcg.io/v2/cards");

        let result = client.search(&CardQuery::ByName("pikachu".into()));
        assert!(matches!(result, Err(FetchError::Invalid(_))));
    }
}
