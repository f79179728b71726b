use crate::{AssertionId, Interaction};
use hyper::Method;
use serde::{Serialize, Serializer};
use std::{cmp::Reverse, fmt::Display};

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Pass,
    Fail,
    Warn,
    NotTested,
}

impl Outcome {
    pub fn severity(&self) -> u8 {
        match self {
            Outcome::Fail => 3,
            Outcome::Warn => 2,
            Outcome::NotTested => 1,
            Outcome::Pass => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Pass => "PASS",
            Outcome::Fail => "FAIL",
            Outcome::Warn => "WARN",
            Outcome::NotTested => "NOT_TESTED",
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub assertion: AssertionId,
    pub result: Outcome,
    #[serde(serialize_with = "serialize_method")]
    pub method: Option<Method>,
    pub status_code: Option<u16>,
    pub uri: Option<String>,
    pub message: String,
}

fn serialize_method<S: Serializer>(method: &Option<Method>, serializer: S) -> Result<S::Ok, S::Error> {
    match method {
        Some(method) => serializer.serialize_some(method.as_str()),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize)]
pub struct Summary {
    pub pass: usize,
    pub fail: usize,
    pub warn: usize,
    pub not_tested: usize,
}

impl Summary {
    pub fn count(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Pass => self.pass,
            Outcome::Fail => self.fail,
            Outcome::Warn => self.warn,
            Outcome::NotTested => self.not_tested,
        }
    }

    pub fn total(&self) -> usize {
        self.pass + self.fail + self.warn + self.not_tested
    }
}

#[derive(Debug, Default)]
pub struct ResultAggregator {
    verdicts: Vec<Verdict>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log<S: Into<String>>(
        &mut self,
        result: Outcome,
        method: Option<Method>,
        status_code: Option<u16>,
        uri: Option<&str>,
        assertion: AssertionId,
        message: S,
    ) {
        self.verdicts.push(Verdict {
            assertion,
            result,
            method,
            status_code,
            uri: uri.map(String::from),
            message: message.into(),
        });
    }

    pub fn log_interaction<S: Into<String>>(
        &mut self,
        result: Outcome,
        interaction: &Interaction,
        assertion: AssertionId,
        message: S,
    ) {
        self.log(
            result,
            Some(interaction.method().clone()),
            Some(interaction.status_code()),
            Some(interaction.uri()),
            assertion,
            message,
        );
    }

    pub fn log_not_tested<S: Into<String>>(&mut self, assertion: AssertionId, message: S) {
        self.log(Outcome::NotTested, None, None, None, assertion, message);
    }

    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn results_for(&self, assertion: AssertionId) -> impl Iterator<Item = &Verdict> {
        self.verdicts
            .iter()
            .filter(move |verdict| verdict.assertion == assertion)
    }

    pub fn find(
        &self,
        assertion: AssertionId,
        method: Option<&Method>,
        uri: Option<&str>,
    ) -> Option<&Verdict> {
        self.results_for(assertion).find(|verdict| {
            verdict.method.as_ref() == method && verdict.uri.as_deref() == uri
        })
    }

    pub fn has_conclusive_result(&self, assertion: AssertionId) -> bool {
        self.results_for(assertion)
            .any(|verdict| verdict.result != Outcome::NotTested)
    }

    pub fn summarize(&self) -> Summary {
        self.verdicts
            .iter()
            .fold(Summary::default(), |mut summary, verdict| {
                match verdict.result {
                    Outcome::Pass => summary.pass += 1,
                    Outcome::Fail => summary.fail += 1,
                    Outcome::Warn => summary.warn += 1,
                    Outcome::NotTested => summary.not_tested += 1,
                }
                summary
            })
    }

    pub fn render(&self, summary: &Summary) -> String {
        let fail_color = if summary.fail > 0 { RED } else { RESET };
        let warn_color = if summary.warn > 0 { YELLOW } else { RESET };

        format!(
            "Summary - {}PASS: {}{}, {}WARN: {}{}, {}FAIL: {}{}, NOT_TESTED: {}",
            GREEN,
            summary.pass,
            RESET,
            warn_color,
            summary.warn,
            RESET,
            fail_color,
            summary.fail,
            RESET,
            summary.not_tested
        )
    }

    /// Every verdict, most severe group first, logging order kept inside a group.
    pub fn render_verdicts(&self) -> String {
        let mut verdicts: Vec<&Verdict> = self.verdicts.iter().collect();
        verdicts.sort_by_key(|verdict| Reverse(verdict.result.severity()));

        let mut rendered = String::new();
        for verdict in verdicts {
            rendered.push_str(&format!(
                "{} {} {} {} {}: {}\n",
                verdict.result,
                verdict.assertion,
                verdict.method.as_ref().map(Method::as_str).unwrap_or("-"),
                verdict
                    .status_code
                    .map(|status_code| status_code.to_string())
                    .unwrap_or_else(|| String::from("-")),
                verdict.uri.as_deref().unwrap_or("-"),
                verdict.message
            ));
        }

        rendered
    }
}
