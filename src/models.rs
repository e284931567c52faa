use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn from_average(average: f64) -> Self {
        if average >= 90.0 {
            Grade::A
        } else if average >= 75.0 {
            Grade::B
        } else if average >= 60.0 {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectStats {
    pub subject: String,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub skew: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    pub class: String,
    pub section: String,
    pub marks: Vec<f64>,
    pub total: f64,
    pub average: f64,
    pub rank: usize,
    pub grade: Grade,
    pub consistency: f64,
    pub strongest_subject: Option<String>,
    pub weakest_subject: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub hardest_subject: Option<String>,
    pub easiest_subject: Option<String>,
    pub most_consistent_subject: Option<String>,
    pub at_risk_count: usize,
}
