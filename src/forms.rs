use rocket::form::FromForm;

use crate::tally::NewPoll;

#[derive(FromForm, Debug)]
pub struct CreateForm {
    pub key: String,
    pub admin_key: String,
    /// Expected number of voters, informational.
    pub number: Option<usize>,
}

#[derive(FromForm, Debug)]
pub struct SubmitForm {
    pub key: String,
    pub index: usize,
    pub sha: String,
    pub choice: Vec<usize>,
}

#[derive(FromForm, Debug)]
pub struct PublishForm {
    pub key: String,
    pub admin_key: String,
    pub index: usize,
}

#[derive(FromForm, Debug)]
pub struct NewForm {
    pub key: String,
    pub admin_key: String,
    #[field(name = "type")]
    pub kind: u8,
    pub text: Option<String>,
    pub autopublish: Option<usize>,
    pub options: Option<String>,
    #[field(name = "0")]
    pub label0: Option<String>,
    #[field(name = "1")]
    pub label1: Option<String>,
    #[field(name = "2")]
    pub label2: Option<String>,
    #[field(name = "3")]
    pub label3: Option<String>,
}

impl NewForm {
    pub fn poll(&self) -> NewPoll {
        NewPoll {
            question: self.text.clone(),
            autopublish: self.autopublish,
            labels: vec![
                self.label0.clone(),
                self.label1.clone(),
                self.label2.clone(),
                self.label3.clone(),
            ],
            options: self.options.clone(),
        }
    }
}
