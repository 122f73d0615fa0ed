//! crates/learning_portal_core/src/catalog.rs
//!
//! The sample data set: a seven item catalog, a learner's performance history
//! and the analytics report that history summarises to. The mock backend is
//! seeded from here and the tests assert against it.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::domain::{
    AnalyticsReport, Content, ContentBody, Difficulty, ExerciseStyle, Performance, ProgressPoint,
    QuizQuestion, Stat,
};

const IMAGE_QUERY: &str = "?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1";

fn image(path: &str) -> Option<String> {
    Some(format!("https://images.pexels.com/photos/{}{}", path, IMAGE_QUERY))
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn sample_catalog() -> Vec<Content> {
    vec![
        Content {
            id: "article_1".into(),
            title: "Understanding Dyslexia".into(),
            topic: "learning_disabilities".into(),
            difficulty: Difficulty::Medium,
            description: "An overview of dyslexia and its impact on learning.".into(),
            tts_enabled: true,
            stt_enabled: false,
            image_url: image("4144179/pexels-photo-4144179.jpeg"),
            body: ContentBody::Article {
                text: "Dyslexia is a learning disability that affects reading, writing, and spelling. \
                       It is characterized by difficulties with accurate word recognition, decoding, and spelling. \
                       People with dyslexia often have trouble reading quickly and may have challenges with reading \
                       comprehension, remembering what they've read, and recognizing words they already know. \
                       Despite these challenges, individuals with dyslexia typically have normal intelligence and \
                       may excel in other areas such as creative thinking, problem-solving, and spatial reasoning."
                    .into(),
            },
        },
        Content {
            id: "article_2".into(),
            title: "Tips for Reading with Dyslexia".into(),
            topic: "reading_strategies".into(),
            difficulty: Difficulty::Easy,
            description: "Practical strategies to improve reading with dyslexia.".into(),
            tts_enabled: true,
            stt_enabled: false,
            image_url: image("7103/writing-notes-idea-conference.jpg"),
            body: ContentBody::Article {
                text: "Use visual aids and tools like colored overlays, which can help reduce visual stress. \
                       Break reading into smaller chunks and take regular breaks. Use a ruler or bookmark to keep \
                       your place while reading. Try audiobooks or text-to-speech tools. Practice with books that \
                       have larger fonts and more spacing. Join a reading group for accountability and support."
                    .into(),
            },
        },
        Content {
            id: "exercise_1".into(),
            title: "Phonological Awareness Game".into(),
            topic: "phonological_awareness".into(),
            difficulty: Difficulty::Easy,
            description: "A fun game to develop phonological awareness skills.".into(),
            tts_enabled: false,
            stt_enabled: true,
            image_url: image("256417/pexels-photo-256417.jpeg"),
            body: ContentBody::Exercise {
                instructions: "Listen to the sounds and identify the correct word. Start by focusing on the \
                               beginning sounds of words, then move to ending sounds, and finally to middle sounds. \
                               This exercise helps build the foundation for reading and spelling."
                    .into(),
                style: ExerciseStyle::Exercise,
            },
        },
        Content {
            id: "video_1".into(),
            title: "What is Auditory Processing Disorder?".into(),
            topic: "auditory_processing".into(),
            difficulty: Difficulty::Medium,
            description: "An informative video explaining auditory processing disorder.".into(),
            tts_enabled: true,
            stt_enabled: false,
            image_url: image("3756766/pexels-photo-3756766.jpeg"),
            body: ContentBody::Video {
                url: "https://example.com/video1".into(),
                duration_secs: 420,
            },
        },
        Content {
            id: "quiz_1".into(),
            title: "Reading Comprehension Quiz".into(),
            topic: "reading_comprehension".into(),
            difficulty: Difficulty::Medium,
            description: "Test your reading comprehension with this quiz.".into(),
            tts_enabled: false,
            stt_enabled: false,
            image_url: image("4145153/pexels-photo-4145153.jpeg"),
            body: ContentBody::Quiz {
                questions: vec![
                    QuizQuestion {
                        id: "q1".into(),
                        text: "What is the main feature of dyslexia?".into(),
                        options: vec![
                            "Difficulty with math calculations".into(),
                            "Difficulty with reading and writing".into(),
                            "Difficulty with social interactions".into(),
                            "Difficulty with physical coordination".into(),
                        ],
                        correct_answer: "Difficulty with reading and writing".into(),
                    },
                    QuizQuestion {
                        id: "q2".into(),
                        text: "Which strategy can help with reading comprehension?".into(),
                        options: vec![
                            "Reading as fast as possible".into(),
                            "Avoiding breaks while reading".into(),
                            "Visualizing what you read".into(),
                            "Using small fonts".into(),
                        ],
                        correct_answer: "Visualizing what you read".into(),
                    },
                ],
            },
        },
        Content {
            id: "article_3".into(),
            title: "The Role of Technology in Dyslexia Support".into(),
            topic: "assistive_technology".into(),
            difficulty: Difficulty::Medium,
            description: "How modern technology can help individuals with dyslexia.".into(),
            tts_enabled: true,
            stt_enabled: false,
            image_url: image("3183150/pexels-photo-3183150.jpeg"),
            body: ContentBody::Article {
                text: "Many technological tools can assist individuals with dyslexia. Text-to-speech software \
                       reads digital text aloud, allowing users to listen rather than read. Speech-to-text \
                       technology converts spoken words into written text, helping with writing tasks. Word \
                       prediction software suggests words as you type, reducing spelling difficulties. Digital \
                       highlighters help focus attention on specific text sections. E-readers with customizable \
                       fonts and spacing improve readability."
                    .into(),
            },
        },
        Content {
            id: "exercise_2".into(),
            title: "Rhyming Words Challenge".into(),
            topic: "phonological_awareness".into(),
            difficulty: Difficulty::Easy,
            description: "Have fun identifying rhyming words.".into(),
            tts_enabled: false,
            stt_enabled: true,
            image_url: image("5905502/pexels-photo-5905502.jpeg"),
            body: ContentBody::Exercise {
                instructions: "Find words that rhyme with the given word. This exercise strengthens your ability \
                               to recognize similar sound patterns in different words, which is a crucial skill \
                               for reading and spelling."
                    .into(),
                style: ExerciseStyle::Game,
            },
        },
    ]
}

pub fn sample_performance() -> Vec<Performance> {
    let record = |activity: &str,
                  timestamp: DateTime<Utc>,
                  score: Option<f64>,
                  time_spent: f64,
                  completion: f64,
                  level: Option<Difficulty>| Performance {
        timestamp,
        activity: activity.to_string(),
        score,
        time_spent_secs: Some(time_spent),
        completion_rate: Some(completion),
        difficulty_level: level,
    };

    vec![
        record("article_1", at(2025, 1, 10, 12, 30), None, 180.0, 100.0, None),
        record("exercise_1", at(2025, 1, 12, 14, 15), Some(85.0), 300.0, 100.0, Some(Difficulty::Easy)),
        record("quiz_1", at(2025, 1, 15, 10, 0), Some(70.0), 450.0, 100.0, Some(Difficulty::Medium)),
        record("article_2", at(2025, 1, 18, 16, 20), None, 150.0, 100.0, None),
        record("exercise_2", at(2025, 1, 20, 11, 45), Some(90.0), 270.0, 100.0, Some(Difficulty::Easy)),
        record("article_3", at(2025, 1, 23, 13, 10), None, 200.0, 85.0, None),
        record("video_1", at(2025, 1, 25, 15, 30), None, 420.0, 100.0, None),
        record("quiz_1", at(2025, 1, 28, 9, 20), Some(85.0), 400.0, 100.0, Some(Difficulty::Medium)),
    ]
}

pub fn sample_report() -> AnalyticsReport {
    AnalyticsReport {
        scores: Stat {
            mean: 82.5,
            min: 70.0,
            max: 90.0,
        },
        time_spent: Stat {
            mean: 296.25,
            min: 150.0,
            max: 450.0,
        },
        completion_rate: Stat {
            mean: 98.125,
            min: 85.0,
            max: 100.0,
        },
        progress_over_time: vec![
            ProgressPoint { date: day(2025, 1, 12), score: 85.0 },
            ProgressPoint { date: day(2025, 1, 15), score: 70.0 },
            ProgressPoint { date: day(2025, 1, 20), score: 90.0 },
            ProgressPoint { date: day(2025, 1, 28), score: 85.0 },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContentKind;
    use std::collections::HashSet;

    #[test]
    fn catalog_ids_are_unique() {
        let catalog = sample_catalog();
        let ids: HashSet<&str> = catalog.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn quiz_has_two_questions_with_valid_answers() {
        let catalog = sample_catalog();
        let quiz = catalog.iter().find(|c| c.id == "quiz_1").unwrap();
        assert_eq!(quiz.kind(), ContentKind::Quiz);
        assert_eq!(quiz.questions().len(), 2);
        for q in quiz.questions() {
            assert!(q.options.contains(&q.correct_answer));
        }
    }

    #[test]
    fn sample_history_is_valid() {
        for record in sample_performance() {
            record.validate().unwrap();
        }
    }
}
