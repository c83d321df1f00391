//! Chart-ready series derived from dashboard aggregates.

use serde::Serialize;

use crate::dashboard::DashboardData;

pub const GREEN: &str = "#10b981";
pub const AMBER: &str = "#f59e0b";
pub const RED: &str = "#ef4444";
pub const ATTENDANCE_GREEN: &str = "#22c55e";
pub const BLUE: &str = "#3b82f6";

const PALETTE: [&str; 8] = [
    "#3b82f6", "#8b5cf6", "#ec4899", "#f59e0b", "#10b981", "#06b6d4", "#f97316", "#64748b",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
    Doughnut,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

impl ChartSeries {
    fn new(title: &str, kind: ChartKind) -> Self {
        Self {
            title: title.to_string(),
            kind,
            labels: Vec::new(),
            values: Vec::new(),
            colors: Vec::new(),
        }
    }

    fn push(&mut self, label: impl Into<String>, value: f64, color: &str) {
        self.labels.push(label.into());
        self.values.push(value);
        self.colors.push(color.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Green up to 5 %, amber up to 10 %, red above.
pub fn attrition_color(rate: f64) -> &'static str {
    if rate <= 5.0 {
        GREEN
    } else if rate <= 10.0 {
        AMBER
    } else {
        RED
    }
}

/// Green from 80 %, amber from 70 %, red below.
pub fn attendance_color(percentage: f64) -> &'static str {
    if percentage >= 80.0 {
        ATTENDANCE_GREEN
    } else if percentage >= 70.0 {
        AMBER
    } else {
        RED
    }
}

fn palette(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub fn headcount_chart(data: &DashboardData) -> ChartSeries {
    let mut series = ChartSeries::new("Headcount by Department", ChartKind::Bar);
    for row in &data.departments {
        series.push(row.department.as_str(), row.headcount as f64, BLUE);
    }
    series
}

pub fn attrition_chart(data: &DashboardData) -> ChartSeries {
    let mut series = ChartSeries::new("Attrition Rate by Department (%)", ChartKind::Bar);
    for row in &data.departments {
        series.push(
            row.department.as_str(),
            row.attrition_rate,
            attrition_color(row.attrition_rate),
        );
    }
    series
}

pub fn gender_chart(data: &DashboardData) -> ChartSeries {
    let mut series = ChartSeries::new("Gender Distribution", ChartKind::Doughnut);
    for (index, bucket) in data.gender.iter().enumerate() {
        series.push(bucket.label.as_str(), bucket.count as f64, palette(index));
    }
    series
}

pub fn salary_by_gender_chart(data: &DashboardData) -> ChartSeries {
    let mut series = ChartSeries::new("Average Salary by Gender", ChartKind::Bar);
    for (index, bucket) in data.salary_by_gender.iter().enumerate() {
        series.push(bucket.label.as_str(), bucket.average, palette(index));
    }
    series
}

pub fn salary_by_age_chart(data: &DashboardData) -> ChartSeries {
    let mut series = ChartSeries::new("Average Salary by Age Group", ChartKind::Bar);
    for bucket in &data.salary_by_age {
        series.push(bucket.label.as_str(), bucket.average, BLUE);
    }
    series
}

pub fn attendance_chart(data: &DashboardData) -> ChartSeries {
    let mut series = ChartSeries::new("Attendance by Department (%)", ChartKind::Bar);
    for row in &data.department_attendance {
        series.push(
            row.department.as_str(),
            row.percentage,
            attendance_color(row.percentage),
        );
    }
    series
}

pub fn leave_chart(data: &DashboardData) -> ChartSeries {
    let mut series = ChartSeries::new("Approved Leave by Type", ChartKind::Pie);
    for (index, bucket) in data.leaves.iter().enumerate() {
        series.push(bucket.label, bucket.count as f64, palette(index));
    }
    series
}

pub fn exit_chart(data: &DashboardData) -> ChartSeries {
    let mut series = ChartSeries::new("Exits by Reason", ChartKind::Pie);
    for (index, bucket) in data.exits.iter().enumerate() {
        series.push(bucket.label, bucket.count as f64, palette(index));
    }
    series
}

/// All dashboard charts, serialized into the page for the client renderer.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardCharts {
    pub headcount: ChartSeries,
    pub attrition: ChartSeries,
    pub gender: ChartSeries,
    pub salary_by_gender: ChartSeries,
    pub salary_by_age: ChartSeries,
    pub attendance: ChartSeries,
    pub leaves: ChartSeries,
    pub exits: ChartSeries,
}

impl DashboardCharts {
    pub fn build(data: &DashboardData) -> Self {
        Self {
            headcount: headcount_chart(data),
            attrition: attrition_chart(data),
            gender: gender_chart(data),
            salary_by_gender: salary_by_gender_chart(data),
            salary_by_age: salary_by_age_chart(data),
            attendance: attendance_chart(data),
            leaves: leave_chart(data),
            exits: exit_chart(data),
        }
    }

    /// JSON safe to inline in a `<script>` element: `<`, `>` and `&` only
    /// occur inside string literals, where their `\u` escapes decode to the
    /// same text.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(json
            .replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .replace('&', "\\u0026"))
    }
}
