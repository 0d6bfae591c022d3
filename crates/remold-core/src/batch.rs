/// Outcome of a batch operation over independent units (files, modules).
///
/// One failing unit never hides the results of the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport<T, E> {
    pub successes: Vec<T>,
    pub failures: Vec<BatchFailure<E>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure<E> {
    /// Human readable name of the unit, e.g. a path or a coordinate.
    pub unit: String,
    pub error: E,
}

impl<T, E> Default for BatchReport<T, E> {
    fn default() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T, E> BatchReport<T, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, unit: impl Into<String>, result: Result<T, E>) {
        match result {
            Ok(value) => self.successes.push(value),
            Err(error) => self.failures.push(BatchFailure {
                unit: unit.into(),
                error,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, E> FromIterator<(String, Result<T, E>)> for BatchReport<T, E> {
    fn from_iter<I: IntoIterator<Item = (String, Result<T, E>)>>(iter: I) -> Self {
        let mut report = BatchReport::new();
        for (unit, result) in iter {
            report.push(unit, result);
        }
        report
    }
}
