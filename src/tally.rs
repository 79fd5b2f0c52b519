use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::error::PollError;

/// The question types a station can hold, addressed on the wire by their
/// `type` id (0..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollKind {
    YesNo,
    Abc,
    Abcd,
    FreeOptionList,
}

impl PollKind {
    pub const ALL: [PollKind; 4] = [
        PollKind::YesNo,
        PollKind::Abc,
        PollKind::Abcd,
        PollKind::FreeOptionList,
    ];

    pub fn id(self) -> u8 {
        match self {
            PollKind::YesNo => 0,
            PollKind::Abc => 1,
            PollKind::Abcd => 2,
            PollKind::FreeOptionList => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PollKind::YesNo => "Yes/No",
            PollKind::Abc => "ABC",
            PollKind::Abcd => "ABCD",
            PollKind::FreeOptionList => "Choice",
        }
    }

    /// Fixed slots of the single-select kinds. Empty for free option lists,
    /// whose labels come from the poll creator.
    pub fn default_labels(self) -> &'static [&'static str] {
        match self {
            PollKind::YesNo => &["No", "Yes"],
            PollKind::Abc => &["A", "B", "C"],
            PollKind::Abcd => &["A", "B", "C", "D"],
            PollKind::FreeOptionList => &[],
        }
    }

    pub fn is_multi_select(self) -> bool {
        matches!(self, PollKind::FreeOptionList)
    }
}

impl TryFrom<u8> for PollKind {
    type Error = PollError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        PollKind::ALL
            .into_iter()
            .find(|k| k.id() == id)
            .ok_or(PollError::UnknownKind(id))
    }
}

/// Creation fields of a poll, as submitted by the station admin.
#[derive(Debug, Clone, Default)]
pub struct NewPoll {
    pub question: Option<String>,
    pub autopublish: Option<usize>,
    /// Per-slot overrides for the fixed labels; `labels[i]` replaces slot `i`.
    pub labels: Vec<Option<String>>,
    /// Newline separated option list for free option polls.
    pub options: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ballot {
    Single(usize),
    Multi(BTreeSet<usize>),
}

impl Ballot {
    fn choices(&self) -> Vec<usize> {
        match self {
            Ballot::Single(c) => vec![*c],
            Ballot::Multi(set) => set.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct Tally {
    kind: PollKind,
    question: String,
    autopublish: usize,
    published: bool,
    options: Vec<String>,
    counts: Vec<u64>,
    ballots: HashMap<String, Ballot>,
}

impl Tally {
    pub fn new(kind: PollKind, fields: &NewPoll) -> Result<Self, PollError> {
        let options = match kind {
            PollKind::FreeOptionList => {
                let text = fields
                    .options
                    .as_deref()
                    .ok_or(PollError::MissingField("options"))?;
                let options = split_options(text);
                if options.is_empty() {
                    return Err(PollError::MissingField("options"));
                }
                options
            }
            _ => kind
                .default_labels()
                .iter()
                .enumerate()
                .map(|(i, &default)| {
                    fields
                        .labels
                        .get(i)
                        .and_then(|l| l.as_deref())
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .unwrap_or(default)
                        .to_string()
                })
                .collect(),
        };
        let counts = vec![0; options.len()];

        Ok(Tally {
            kind,
            question: fields.question.clone().unwrap_or_default(),
            autopublish: fields.autopublish.unwrap_or_default(),
            published: false,
            options,
            counts,
            ballots: HashMap::new(),
        })
    }

    pub fn kind(&self) -> PollKind {
        self.kind
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn autopublish(&self) -> usize {
        self.autopublish
    }

    pub fn published(&self) -> bool {
        self.published
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn ballots_cast(&self) -> usize {
        self.ballots.len()
    }

    pub fn ballot(&self, voter: &str) -> Option<&Ballot> {
        self.ballots.get(voter)
    }

    /// Once published, a poll stays published.
    pub fn publish(&mut self) {
        self.published = true;
    }

    /// Records the ballot of `voter`. A voter submitting again replaces their
    /// previous ballot, its counts are withdrawn first.
    pub fn submit(&mut self, voter: &str, choices: &[usize]) -> Result<(), PollError> {
        let ballot = self.ballot_for(choices)?;
        tracing::debug!("{} -> {:?}", voter, ballot);

        if let Some(previous) = self.ballots.insert(voter.to_string(), ballot.clone()) {
            for c in previous.choices() {
                self.counts[c] -= 1;
            }
        }
        for c in ballot.choices() {
            self.counts[c] += 1;
        }

        if self.ballots.len() == self.autopublish {
            self.published = true;
        }
        Ok(())
    }

    /// Labels paired with their counts. Free option lists come sorted by
    /// ascending count, ties broken by label; fixed kinds keep slot order.
    pub fn results(&self) -> Vec<ResultRow> {
        let mut rows: Vec<ResultRow> = self
            .options
            .iter()
            .zip(self.counts.iter())
            .map(|(label, &count)| ResultRow {
                label: label.clone(),
                count,
            })
            .collect();
        if self.kind.is_multi_select() {
            rows.sort_by(|a, b| (a.count, &a.label).cmp(&(b.count, &b.label)));
        }
        rows
    }

    fn ballot_for(&self, choices: &[usize]) -> Result<Ballot, PollError> {
        if let Some(&bad) = choices.iter().find(|&&c| c >= self.options.len()) {
            return Err(PollError::InvalidChoice(bad));
        }
        if self.kind.is_multi_select() {
            return Ok(Ballot::Multi(choices.iter().copied().collect()));
        }
        match choices {
            [] => Err(PollError::MissingField("choice")),
            [c] => Ok(Ballot::Single(*c)),
            // single-select polls take exactly one choice
            [_, extra, ..] => Err(PollError::InvalidChoice(*extra)),
        }
    }
}

fn split_options(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll(kind: PollKind, autopublish: usize) -> Tally {
        let fields = NewPoll {
            question: Some("Lunch?".to_string()),
            autopublish: Some(autopublish),
            options: Some("Apple\nBanana\nCherry".to_string()),
            ..Default::default()
        };
        Tally::new(kind, &fields).unwrap()
    }

    #[test]
    fn construction_zeroes_counts() {
        for kind in PollKind::ALL {
            let t = poll(kind, 0);
            assert_eq!(t.options().len(), t.counts().len());
            assert!(t.counts().iter().all(|&c| c == 0));
            assert!(!t.published());
        }
        assert_eq!(poll(PollKind::YesNo, 0).options(), ["No", "Yes"]);
        assert_eq!(poll(PollKind::Abcd, 0).options().len(), 4);
    }

    #[test]
    fn free_options_skip_blank_lines() {
        let fields = NewPoll {
            options: Some("Apple\r\n  Banana \n\n   \nCherry\n".to_string()),
            ..Default::default()
        };
        let t = Tally::new(PollKind::FreeOptionList, &fields).unwrap();
        assert_eq!(t.options(), ["Apple", "Banana", "Cherry"]);
        assert_eq!(t.counts(), [0, 0, 0]);
        assert_eq!(t.question(), "");
        assert_eq!(t.autopublish(), 0);
    }

    #[test]
    fn free_options_required() {
        let missing = Tally::new(PollKind::FreeOptionList, &NewPoll::default());
        assert_eq!(missing.unwrap_err(), PollError::MissingField("options"));

        let blank = NewPoll {
            options: Some("\n  \n".to_string()),
            ..Default::default()
        };
        assert!(Tally::new(PollKind::FreeOptionList, &blank).is_err());
    }

    #[test]
    fn label_overrides() {
        let fields = NewPoll {
            labels: vec![None, Some("Blue".to_string()), Some("  ".to_string())],
            ..Default::default()
        };
        let t = Tally::new(PollKind::Abc, &fields).unwrap();
        assert_eq!(t.options(), ["A", "Blue", "C"]);
    }

    #[test]
    fn kind_ids() {
        for kind in PollKind::ALL {
            assert_eq!(PollKind::try_from(kind.id()), Ok(kind));
        }
        assert_eq!(PollKind::try_from(4), Err(PollError::UnknownKind(4)));
    }

    #[test]
    fn single_select_increments_one_slot() {
        let mut t = poll(PollKind::Abcd, 0);
        t.submit("v1", &[2]).unwrap();
        assert_eq!(t.counts(), [0, 0, 1, 0]);
        assert_eq!(t.ballot("v1"), Some(&Ballot::Single(2)));
    }

    #[test]
    fn multi_select_increments_each_choice() {
        let mut t = poll(PollKind::FreeOptionList, 0);
        t.submit("v1", &[0, 2]).unwrap();
        assert_eq!(t.counts(), [1, 0, 1]);

        // duplicates within one ballot count once
        t.submit("v2", &[1, 1]).unwrap();
        assert_eq!(t.counts(), [1, 1, 1]);

        t.submit("v3", &[]).unwrap();
        assert_eq!(t.counts(), [1, 1, 1]);
        assert_eq!(t.ballots_cast(), 3);
    }

    #[test]
    fn resubmission_replaces_ballot() {
        let mut t = poll(PollKind::YesNo, 0);
        t.submit("v1", &[1]).unwrap();
        t.submit("v1", &[0]).unwrap();
        assert_eq!(t.counts(), [1, 0]);
        assert_eq!(t.ballots_cast(), 1);

        let mut t = poll(PollKind::FreeOptionList, 0);
        t.submit("v1", &[0, 1]).unwrap();
        t.submit("v1", &[1, 2]).unwrap();
        assert_eq!(t.counts(), [0, 1, 1]);
    }

    #[test]
    fn invalid_choices_leave_state_untouched() {
        let mut t = poll(PollKind::FreeOptionList, 0);
        assert_eq!(t.submit("v1", &[0, 3]), Err(PollError::InvalidChoice(3)));
        assert_eq!(t.counts(), [0, 0, 0]);
        assert_eq!(t.ballots_cast(), 0);

        let mut t = poll(PollKind::YesNo, 0);
        assert_eq!(t.submit("v1", &[2]), Err(PollError::InvalidChoice(2)));
        assert_eq!(t.submit("v1", &[]), Err(PollError::MissingField("choice")));
        assert_eq!(t.submit("v1", &[0, 1]), Err(PollError::InvalidChoice(1)));
        assert_eq!(t.counts(), [0, 0]);
    }

    #[test]
    fn autopublish_at_threshold() {
        let mut t = poll(PollKind::YesNo, 2);
        t.submit("v1", &[1]).unwrap();
        assert_eq!(t.counts(), [0, 1]);
        assert!(!t.published());
        t.submit("v2", &[0]).unwrap();
        assert_eq!(t.counts(), [1, 1]);
        assert!(t.published());
    }

    #[test]
    fn zero_threshold_never_autopublishes() {
        let mut t = poll(PollKind::Abc, 0);
        for voter in ["a", "b", "c"] {
            t.submit(voter, &[0]).unwrap();
        }
        assert!(!t.published());
        t.publish();
        assert!(t.published());
    }

    #[test]
    fn free_option_results_sorted() {
        let fields = NewPoll {
            options: Some("Pear\nApple\nFig".to_string()),
            ..Default::default()
        };
        let mut t = Tally::new(PollKind::FreeOptionList, &fields).unwrap();
        t.submit("v1", &[0, 2]).unwrap();
        t.submit("v2", &[0]).unwrap();
        let rows: Vec<(u64, String)> = t.results().into_iter().map(|r| (r.count, r.label)).collect();
        assert_eq!(
            rows,
            vec![
                (0, "Apple".to_string()),
                (1, "Fig".to_string()),
                (2, "Pear".to_string())
            ]
        );
    }

    #[test]
    fn fixed_results_keep_slot_order() {
        let mut t = poll(PollKind::YesNo, 0);
        t.submit("v1", &[0]).unwrap();
        t.submit("v2", &[0]).unwrap();
        let labels: Vec<_> = t.results().into_iter().map(|r| r.label).collect();
        assert_eq!(labels, ["No", "Yes"]);
    }
}
