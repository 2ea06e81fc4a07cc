use super::source::{CardQuery, CardSource};
use crate::http::FetchError;
use pokedex_common::{select_best, tcg_name_token, CardCandidate, CatalogEntry, ResolvedRecord};
use std::time::Duration;
use tracing::{debug, warn};

/// 番号検索の再試行設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

/// 再試行つきで1クエリを実行
///
/// - 成功したらその候補（0件もあり得る）
/// - 上限までは失敗の種類を問わず待機して再試行
/// - 最終試行が非2xx・不正レスポンスなら候補0件
/// - 最終試行が通信エラーなら `Err`
pub fn attempt<S: CardSource + ?Sized>(
    source: &S,
    query: &CardQuery,
    policy: &RetryPolicy,
) -> Result<Vec<CardCandidate>, FetchError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt_no = 1;

    loop {
        match source.search(query) {
            Ok(candidates) => return Ok(candidates),
            Err(err) if attempt_no < attempts => {
                warn!(
                    "{} 失敗 ({}/{}): {} → {:?}後に再試行",
                    query.to_filter(),
                    attempt_no,
                    attempts,
                    err,
                    policy.backoff
                );
                std::thread::sleep(policy.backoff);
                attempt_no += 1;
            }
            Err(err) if err.is_transient() => return Err(err),
            Err(err) => {
                warn!("{} 失敗: {} → 候補なしとして扱います", query.to_filter(), err);
                return Ok(Vec::new());
            }
        }
    }
}

/// 図鑑番号 → 最良カード
pub struct CardResolver<S> {
    source: S,
    policy: RetryPolicy,
}

impl<S: CardSource> CardResolver<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// 最良カードを解決
    ///
    /// 番号検索が0件なら名前で1回だけ検索し直す。
    /// `Ok(None)` は見つからなかったことを表し、`Err` は番号検索の通信エラーが
    /// 再試行上限に達した場合のみ。
    pub fn resolve(&self, entry: &CatalogEntry) -> Result<Option<ResolvedRecord>, FetchError> {
        let mut candidates = attempt(&self.source, &CardQuery::ByNumber(entry.id), &self.policy)?;

        if candidates.is_empty() {
            let query = CardQuery::ByName(tcg_name_token(&entry.display_name));
            debug!("#{} 番号検索0件 → {}", entry.id, query.to_filter());
            candidates = match self.source.search(&query) {
                Ok(found) => found,
                Err(err) => {
                    warn!("{} 失敗: {}", query.to_filter(), err);
                    Vec::new()
                }
            };
        }

        let best = match select_best(&candidates) {
            Some(best) => best.clone(),
            None => return Ok(None),
        };

        Ok(best.into_record(&entry.display_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokedex_common::CardImages;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// 応答を順番に返す偽の取得元
    struct ScriptedSource {
        responses: RefCell<VecDeque<Result<Vec<CardCandidate>, FetchError>>>,
        queries: RefCell<Vec<CardQuery>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Vec<CardCandidate>, FetchError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl CardSource for ScriptedSource {
        fn search(&self, query: &CardQuery) -> Result<Vec<CardCandidate>, FetchError> {
            self.queries.borrow_mut().push(query.clone());
            self.responses.borrow_mut().pop_front().unwrap_or(Ok(Vec::new()))
        }
    }

    fn no_wait() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 2,
            backoff: Duration::ZERO,
        }
    }

    fn card(rarity: &str, large: Option<&str>) -> CardCandidate {
        CardCandidate {
            display_name: Some(format!("{} card", rarity)),
            rarity_label: Some(rarity.to_string()),
            collection_name: Some("Base".into()),
            images: CardImages {
                small: None,
                large: large.map(String::from),
            },
        }
    }

    fn timeout() -> FetchError {
        FetchError::Transient("operation timed out".into())
    }

    fn too_many_requests() -> FetchError {
        FetchError::Status {
            status: 429,
            url: "https://api.pokemontcg.io/v2/cards".into(),
        }
    }

    #[test]
    fn test_attempt_retries_transient_then_succeeds() {
        let source = ScriptedSource::new(vec![Err(timeout()), Ok(vec![card("Rare", Some("L"))])]);
        let result = attempt(&source, &CardQuery::ByNumber(1), &no_wait()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(source.queries.borrow().len(), 2);
    }

    #[test]
    fn test_attempt_exhausted_transient_is_error() {
        let source = ScriptedSource::new(vec![Err(timeout()), Err(timeout()), Ok(vec![])]);
        let result = attempt(&source, &CardQuery::ByNumber(1), &no_wait());
        assert!(matches!(result, Err(FetchError::Transient(_))));
        // 上限2回で打ち切り
        assert_eq!(source.queries.borrow().len(), 2);
    }

    #[test]
    fn test_attempt_final_status_is_empty() {
        let source = ScriptedSource::new(vec![Err(timeout()), Err(too_many_requests())]);
        let result = attempt(&source, &CardQuery::ByNumber(1), &no_wait()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_attempt_single_attempt_policy() {
        let policy = RetryPolicy {
            max_attempts: 1,
            backoff: Duration::ZERO,
        };
        let source = ScriptedSource::new(vec![Err(too_many_requests()), Ok(vec![card("Rare", None)])]);
        let result = attempt(&source, &CardQuery::ByNumber(1), &policy).unwrap();
        assert!(result.is_empty());
        assert_eq!(source.queries.borrow().len(), 1);
    }

    #[test]
    fn test_resolve_by_number() {
        let source = ScriptedSource::new(vec![Ok(vec![card("Rare Holo", Some("L"))])]);
        let resolver = CardResolver::new(source, no_wait());

        let record = resolver.resolve(&CatalogEntry::new(1, "Bulbasaur")).unwrap().unwrap();
        assert_eq!(record.image_reference, "L");
        assert_eq!(record.rarity_label, "Rare Holo");
        assert_eq!(record.collection_name, "Base");
        assert_eq!(resolver.source().queries.borrow().as_slice(), &[CardQuery::ByNumber(1)]);
    }

    #[test]
    fn test_resolve_falls_back_to_name_once() {
        let source = ScriptedSource::new(vec![Ok(vec![]), Ok(vec![card("Uncommon", Some("N"))])]);
        let resolver = CardResolver::new(source, no_wait());

        let record = resolver.resolve(&CatalogEntry::new(122, "Mr. Mime")).unwrap().unwrap();
        assert_eq!(record.image_reference, "N");
        assert_eq!(
            resolver.source().queries.borrow().as_slice(),
            &[CardQuery::ByNumber(122), CardQuery::ByName("mr. mime".into())]
        );
    }

    #[test]
    fn test_resolve_name_fallback_not_retried() {
        let source = ScriptedSource::new(vec![Ok(vec![]), Err(timeout()), Ok(vec![card("Rare", Some("X"))])]);
        let resolver = CardResolver::new(source, no_wait());

        let result = resolver.resolve(&CatalogEntry::new(29, "Nidoran♀")).unwrap();
        assert!(result.is_none());
        assert_eq!(resolver.source().queries.borrow().len(), 2);
    }

    #[test]
    fn test_resolve_not_found() {
        let source = ScriptedSource::new(vec![Ok(vec![]), Ok(vec![])]);
        let resolver = CardResolver::new(source, no_wait());
        assert!(resolver.resolve(&CatalogEntry::new(9999, "Missingno")).unwrap().is_none());
    }

    #[test]
    fn test_resolve_best_without_image_is_not_found() {
        // 最高スコアの候補に画像が無ければ、下位の候補に落とさず「見つからない」
        let source = ScriptedSource::new(vec![Ok(vec![card("Common", Some("C")), card("Secret Rare", None)])]);
        let resolver = CardResolver::new(source, no_wait());
        assert!(resolver.resolve(&CatalogEntry::new(1, "Bulbasaur")).unwrap().is_none());
    }

    #[test]
    fn test_resolve_transport_failure_skips_name_query() {
        let source = ScriptedSource::new(vec![Err(timeout()), Err(timeout())]);
        let resolver = CardResolver::new(source, no_wait());

        let result = resolver.resolve(&CatalogEntry::new(1, "Bulbasaur"));
        assert!(result.is_err());
        assert_eq!(resolver.source().queries.borrow().len(), 2);
    }
}
