use chrono::{NaiveDate, NaiveTime};

/// Coarse sort bucket for a release-date string. Declaration order is the
/// sort order: announced-but-undated titles first, dated titles next,
/// unparseable ones last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Soon,
    Dated,
    Unknown,
}

/// Total-order key for a release-date string.
///
/// Within [`Tier::Dated`], `order` is the negated midnight timestamp of the
/// parsed date, so newer releases compare smaller and sort first. The other
/// tiers use fixed sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RankKey {
    pub tier: Tier,
    pub order: i64,
}

impl RankKey {
    pub const SOON: RankKey = RankKey {
        tier: Tier::Soon,
        order: i64::MIN,
    };

    pub const UNKNOWN: RankKey = RankKey {
        tier: Tier::Unknown,
        order: i64::MAX,
    };

    fn dated(date: NaiveDate) -> Self {
        let midnight = date.and_time(NaiveTime::MIN);
        RankKey {
            tier: Tier::Dated,
            order: -midnight.and_utc().timestamp(),
        }
    }
}

/// Ranks free-form release-date text into a [`RankKey`].
///
/// The ranker is deliberately clock-free: the year assumed for day-month
/// strings ("15 May") is supplied at construction, which keeps ranking a
/// pure function of its inputs.
#[derive(Debug, Clone, Copy)]
pub struct ReleaseRanker {
    assumed_year: i32,
}

impl ReleaseRanker {
    /// A ranker that completes year-less dates with `year`.
    pub fn for_year(year: i32) -> Self {
        Self { assumed_year: year }
    }

    /// Ranking rules, in priority order:
    /// 1. anything containing "soon" (case-insensitive) ranks first;
    /// 2. "15 May 2025" ranks by date, newest first;
    /// 3. "May 2025" is read as the 1st of that month;
    /// 4. "15 May" is read in the assumed year;
    /// 5. everything else ranks last.
    pub fn key(&self, text: &str) -> RankKey {
        let text = text.trim();
        if text.to_lowercase().contains("soon") {
            return RankKey::SOON;
        }
        match self.parse_release_date(text) {
            Some(date) => RankKey::dated(date),
            None => RankKey::UNKNOWN,
        }
    }

    /// Accepts `day month year`, `month year` and `day month`. Month names
    /// may be full or abbreviated, any case. Anything with leftover input
    /// (extra words, numeric-only strings) fails all three forms.
    fn parse_release_date(&self, text: &str) -> Option<NaiveDate> {
        const FORM: &str = "%d %B %Y";
        NaiveDate::parse_from_str(text, FORM)
            .or_else(|_| NaiveDate::parse_from_str(&format!("1 {text}"), FORM))
            .or_else(|_| {
                NaiveDate::parse_from_str(&format!("{text} {}", self.assumed_year), FORM)
            })
            .ok()
    }
}
