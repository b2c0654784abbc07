use serde::{Deserialize, Serialize};

/// A course owned by the current teacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub module_count: Option<u32>,
    #[serde(default)]
    pub lesson_count: Option<u32>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Course {
    /// Tier label, "FREE" when unset.
    pub fn tier_label(&self) -> String {
        self.tier
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("free")
            .to_uppercase()
    }
}

/// A single lesson, looked up by slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub course_id: Option<i64>,
    #[serde(default)]
    pub playback_id: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Lesson {
    /// A lesson can be played once its video has a playback id.
    pub fn has_video(&self) -> bool {
        self.playback_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }
}

/// Catalogue totals shown on the landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    #[serde(default)]
    pub course_count: u64,
    #[serde(default)]
    pub lesson_count: u64,
}

/// Totals shown on the teacher portal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeacherSummary {
    pub total_courses: usize,
    pub total_modules: u64,
    pub total_lessons: u64,
}

impl TeacherSummary {
    pub fn from_courses(courses: &[Course]) -> Self {
        Self {
            total_courses: courses.len(),
            total_modules: courses
                .iter()
                .map(|c| u64::from(c.module_count.unwrap_or(0)))
                .sum(),
            total_lessons: courses
                .iter()
                .map(|c| u64::from(c.lesson_count.unwrap_or(0)))
                .sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_treats_missing_counts_as_zero() {
        let courses: Vec<Course> = serde_json::from_str(
            r#"[
                {"id":1,"title":"Rust 101","module_count":3,"lesson_count":12,"tier":"pro"},
                {"id":2,"title":"Async","lesson_count":4},
                {"id":3,"title":"Draft"}
            ]"#,
        )
        .unwrap();

        let summary = TeacherSummary::from_courses(&courses);
        assert_eq!(
            summary,
            TeacherSummary {
                total_courses: 3,
                total_modules: 3,
                total_lessons: 16,
            }
        );
        assert_eq!(courses[0].tier_label(), "PRO");
        assert_eq!(courses[2].tier_label(), "FREE");
    }

    #[test]
    fn test_lesson_video_needs_playback_id() {
        let lesson: Lesson = serde_json::from_str(
            r#"{"id":5,"title":"Ownership","slug":"ownership","playback_id":"p1","duration":310.5}"#,
        )
        .unwrap();
        assert!(lesson.has_video());

        let draft: Lesson =
            serde_json::from_str(r#"{"id":6,"title":"Draft","slug":"draft","playback_id":" "}"#)
                .unwrap();
        assert!(!draft.has_video());
        assert_eq!(draft.course_id, None);
    }

    #[test]
    fn test_platform_stats_default_missing_counts() {
        let stats: PlatformStats = serde_json::from_str(r#"{"course_count":12}"#).unwrap();
        assert_eq!(
            stats,
            PlatformStats {
                course_count: 12,
                lesson_count: 0,
            }
        );
    }

    #[test]
    fn test_summary_of_no_courses() {
        assert_eq!(TeacherSummary::from_courses(&[]), TeacherSummary::default());
    }
}
