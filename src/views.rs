use serde::Serialize;

use crate::{
    station::Station,
    tally::{PollKind, ResultRow, Tally},
};

#[derive(Serialize, Debug)]
pub struct KindView {
    #[serde(rename = "type")]
    pub id: u8,
    pub name: &'static str,
    pub labels: &'static [&'static str],
}

impl From<PollKind> for KindView {
    fn from(kind: PollKind) -> Self {
        KindView {
            id: kind.id(),
            name: kind.name(),
            labels: kind.default_labels(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct PollView {
    pub index: usize,
    pub kind: KindView,
    pub question: String,
    pub options: Vec<String>,
    pub multi_select: bool,
    pub published: bool,
    pub voted: bool,
    pub ballots: Option<usize>,
    pub results: Option<Vec<ResultRow>>,
}

impl PollView {
    fn new(index: usize, tally: &Tally) -> Self {
        PollView {
            index,
            kind: tally.kind().into(),
            question: tally.question().to_string(),
            options: tally.options().to_vec(),
            multi_select: tally.kind().is_multi_select(),
            published: tally.published(),
            voted: false,
            ballots: None,
            results: None,
        }
    }
}

/// What a voter sees: results only for published polls.
#[derive(Serialize, Debug)]
pub struct VoteView {
    pub key: String,
    pub polls: Vec<PollView>,
    pub history: Vec<usize>,
}

impl VoteView {
    pub fn new(station: &Station, history: &[usize]) -> Self {
        let polls = station
            .tallies()
            .iter()
            .enumerate()
            .map(|(i, t)| PollView {
                voted: history.contains(&i),
                results: t.published().then(|| t.results()),
                ..PollView::new(i, t)
            })
            .collect();
        VoteView {
            key: station.key().to_string(),
            polls,
            history: history.to_vec(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct AdminView {
    pub key: String,
    pub admin_key: String,
    pub expected_voters: usize,
    pub kinds: Vec<KindView>,
    pub polls: Vec<PollView>,
}

impl AdminView {
    pub fn new(station: &Station) -> Self {
        let polls = station
            .tallies()
            .iter()
            .enumerate()
            .map(|(i, t)| PollView {
                ballots: Some(t.ballots_cast()),
                results: Some(t.results()),
                ..PollView::new(i, t)
            })
            .collect();
        AdminView {
            key: station.key().to_string(),
            admin_key: station.admin_key().to_string(),
            expected_voters: station.expected_voters(),
            kinds: PollKind::ALL.into_iter().map(KindView::from).collect(),
            polls,
        }
    }
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct ErrorView {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ErrorView {
    pub fn illegal() -> Self {
        ErrorView {
            error: "illegal",
            reason: None,
        }
    }

    pub fn bad_request(reason: String) -> Self {
        ErrorView {
            error: "bad request",
            reason: Some(reason),
        }
    }

    pub fn internal() -> Self {
        ErrorView {
            error: "internal error",
            reason: None,
        }
    }
}
