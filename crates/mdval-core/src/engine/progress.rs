use crate::core::energy::canonical::Engine;

#[derive(Debug, Clone)]
pub enum Progress {
    EvaluationStart { engine: Engine, label: String },
    StepStart { step: &'static str },
    EvaluationFinish,

    SuiteStart { total_cases: u64 },
    CaseFinish { name: String, passed: bool },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
