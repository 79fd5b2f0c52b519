use crate::{
    error::PollError,
    tally::{NewPoll, PollKind, Tally},
};

pub const MAX_POLLS: usize = 1000;

/// A group of polls sharing one admin key.
#[derive(Debug)]
pub struct Station {
    key: String,
    admin_key: String,
    expected_voters: usize,
    max_polls: usize,
    tallies: Vec<Tally>,
}

impl Station {
    pub fn new(key: &str, admin_key: &str, expected_voters: usize) -> Self {
        Self::with_limit(key, admin_key, expected_voters, MAX_POLLS)
    }

    pub fn with_limit(key: &str, admin_key: &str, expected_voters: usize, max_polls: usize) -> Self {
        Station {
            key: key.to_string(),
            admin_key: admin_key.to_string(),
            expected_voters,
            max_polls,
            tallies: vec![],
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn admin_key(&self) -> &str {
        &self.admin_key
    }

    pub fn expected_voters(&self) -> usize {
        self.expected_voters
    }

    pub fn tallies(&self) -> &[Tally] {
        &self.tallies
    }

    pub fn tally(&self, index: usize) -> Result<&Tally, PollError> {
        self.tallies.get(index).ok_or(PollError::IndexOutOfRange(index))
    }

    /// Guard for admin handlers.
    pub fn authorize(&self, admin_key: &str) -> Result<&Self, PollError> {
        if admin_key == self.admin_key {
            Ok(self)
        } else {
            Err(PollError::Unauthorized)
        }
    }

    /// Appends a new poll and returns its index. Returns `Ok(None)` without
    /// touching the station when the admin key is wrong or the station is full.
    pub fn add_tally(
        &mut self,
        admin_key: &str,
        kind: PollKind,
        fields: &NewPoll,
    ) -> Result<Option<usize>, PollError> {
        if self.tallies.len() >= self.max_polls {
            tracing::warn!("Station {} is full, poll ignored", self.key);
            return Ok(None);
        }
        if self.authorize(admin_key).is_err() {
            tracing::warn!("Admin key mismatch on {}, poll ignored", self.key);
            return Ok(None);
        }
        let tally = Tally::new(kind, fields)?;
        self.tallies.push(tally);
        let index = self.tallies.len() - 1;
        tracing::info!("Station {}: new {} poll #{}", self.key, kind.name(), index);
        Ok(Some(index))
    }

    /// A wrong admin key is ignored silently.
    pub fn publish(&mut self, admin_key: &str, index: usize) -> Result<(), PollError> {
        if self.authorize(admin_key).is_err() {
            tracing::warn!("Admin key mismatch on {}, publish ignored", self.key);
            return Ok(());
        }
        let tally = self
            .tallies
            .get_mut(index)
            .ok_or(PollError::IndexOutOfRange(index))?;
        tally.publish();
        tracing::info!("Station {}: poll #{} published", self.key, index);
        Ok(())
    }

    pub fn submit_vote(
        &mut self,
        voter: &str,
        index: usize,
        choices: &[usize],
    ) -> Result<usize, PollError> {
        let tally = self
            .tallies
            .get_mut(index)
            .ok_or(PollError::IndexOutOfRange(index))?;
        tally.submit(voter, choices)?;
        tracing::info!("Station {}: vote on poll #{}", self.key, index);
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yes_no(autopublish: usize) -> NewPoll {
        NewPoll {
            question: Some("Agreed?".to_string()),
            autopublish: Some(autopublish),
            ..Default::default()
        }
    }

    #[test]
    fn add_and_vote() {
        let mut s = Station::new("s1", "a1", 0);
        assert_eq!(s.add_tally("a1", PollKind::YesNo, &yes_no(0)), Ok(Some(0)));
        assert_eq!(s.add_tally("a1", PollKind::Abc, &yes_no(0)), Ok(Some(1)));
        assert_eq!(s.submit_vote("v1", 1, &[2]), Ok(1));
        assert_eq!(s.tally(1).unwrap().counts(), [0, 0, 1]);
        assert_eq!(s.tally(0).unwrap().counts(), [0, 0]);
    }

    #[test]
    fn wrong_admin_key_changes_nothing() {
        let mut s = Station::new("s1", "a1", 0);
        assert_eq!(s.add_tally("nope", PollKind::YesNo, &yes_no(0)), Ok(None));
        assert!(s.tallies().is_empty());

        s.add_tally("a1", PollKind::YesNo, &yes_no(0)).unwrap();
        assert_eq!(s.publish("nope", 0), Ok(()));
        assert!(!s.tally(0).unwrap().published());
        s.publish("a1", 0).unwrap();
        assert!(s.tally(0).unwrap().published());
    }

    #[test]
    fn authorize_guard() {
        let s = Station::new("s1", "a1", 0);
        assert!(s.authorize("a1").is_ok());
        assert_eq!(s.authorize("").unwrap_err(), PollError::Unauthorized);
    }

    #[test]
    fn out_of_range_index() {
        let mut s = Station::new("s1", "a1", 0);
        assert_eq!(s.publish("a1", 0), Err(PollError::IndexOutOfRange(0)));
        assert_eq!(s.submit_vote("v1", 3, &[0]), Err(PollError::IndexOutOfRange(3)));
    }

    #[test]
    fn bad_poll_fields_rejected() {
        let mut s = Station::new("s1", "a1", 0);
        let res = s.add_tally("a1", PollKind::FreeOptionList, &NewPoll::default());
        assert_eq!(res, Err(PollError::MissingField("options")));
        assert!(s.tallies().is_empty());
    }

    #[test]
    fn full_station_ignores_new_polls() {
        let mut s = Station::with_limit("s1", "a1", 0, 2);
        s.add_tally("a1", PollKind::YesNo, &yes_no(0)).unwrap();
        s.add_tally("a1", PollKind::YesNo, &yes_no(0)).unwrap();
        assert_eq!(s.add_tally("a1", PollKind::YesNo, &yes_no(0)), Ok(None));
        assert_eq!(s.tallies().len(), 2);
    }

    #[test]
    fn default_cap_is_a_thousand() {
        let mut s = Station::new("s1", "a1", 0);
        for _ in 0..MAX_POLLS {
            s.add_tally("a1", PollKind::YesNo, &yes_no(0)).unwrap();
        }
        assert_eq!(s.add_tally("a1", PollKind::YesNo, &yes_no(0)), Ok(None));
        assert_eq!(s.tallies().len(), MAX_POLLS);
    }
}
