use crate::core::text::char_len;
use crate::tools::orchestrator::AttemptOutcome;
use crate::types::PageExtract;

/// Summaries shorter than this carry too little to answer from.
pub const MIN_SUMMARY_CHARS: usize = 100;

/// Per-attempt signal derived from the caller's message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentSignal {
    /// The user asked to dig deeper. The orchestrator raises this for the
    /// first attempt of a call only.
    pub forced_deeper: bool,
}

/// Decides whether an attempt's result is good enough to stop retrying.
pub trait SufficiencyJudge: Send + Sync {
    fn is_sufficient(&self, outcome: &AttemptOutcome, intent: &IntentSignal) -> bool;
}

/// Structural check: any table or product card, or a summary of at least
/// [`MIN_SUMMARY_CHARS`] characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicJudge;

impl HeuristicJudge {
    pub fn has_enough_content(extract: &PageExtract) -> bool {
        !extract.tables.is_empty()
            || !extract.product_cards.is_empty()
            || char_len(&extract.summary) >= MIN_SUMMARY_CHARS
    }
}

impl SufficiencyJudge for HeuristicJudge {
    fn is_sufficient(&self, outcome: &AttemptOutcome, intent: &IntentSignal) -> bool {
        match outcome {
            AttemptOutcome::Page(extract) => {
                !intent.forced_deeper && Self::has_enough_content(extract)
            }
            AttemptOutcome::Unsupported(_) | AttemptOutcome::Failed(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraping::fetcher::FetchError;
    use crate::types::{ProductCard, Table};

    fn page(extract: PageExtract) -> AttemptOutcome {
        AttemptOutcome::Page(extract)
    }

    #[test]
    fn any_structural_signal_is_enough() {
        let judge = HeuristicJudge;
        let plain = IntentSignal::default();

        assert!(!judge.is_sufficient(&page(PageExtract::default()), &plain));
        assert!(judge.is_sufficient(
            &page(PageExtract {
                tables: vec![Table::default()],
                ..Default::default()
            }),
            &plain
        ));
        assert!(judge.is_sufficient(
            &page(PageExtract {
                product_cards: vec![ProductCard::default()],
                ..Default::default()
            }),
            &plain
        ));
        assert!(!judge.is_sufficient(
            &page(PageExtract {
                summary: "s".repeat(MIN_SUMMARY_CHARS - 1),
                ..Default::default()
            }),
            &plain
        ));
        assert!(judge.is_sufficient(
            &page(PageExtract {
                summary: "s".repeat(MIN_SUMMARY_CHARS),
                ..Default::default()
            }),
            &plain
        ));
    }

    #[test]
    fn forced_deeper_and_errors_are_insufficient() {
        let judge = HeuristicJudge;
        let rich = page(PageExtract {
            tables: vec![Table::default()],
            ..Default::default()
        });
        assert!(!judge.is_sufficient(&rich, &IntentSignal { forced_deeper: true }));
        assert!(!judge.is_sufficient(
            &AttemptOutcome::Failed(FetchError::Status(500)),
            &IntentSignal::default()
        ));
    }
}
