use chrono::{DateTime, Utc};
use folio_di::Build;
use folio_shared_contracts::time::TimeService;
use folio_utils::trace_instrument;

#[derive(Debug, Clone, Copy, Build)]
pub struct TimeServiceImpl;

impl TimeService for TimeServiceImpl {
    #[trace_instrument(skip(self))]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::*;

    #[test]
    fn current_year_matches_now() {
        let sut = TimeServiceImpl;
        let before = Utc::now().year();
        let year = sut.current_year();
        assert!(year == before || year == before + 1);
    }
}
