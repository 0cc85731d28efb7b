//! Prompts for short explainer videos about what a session covered.
//!
//! Rendering happens in the cloud media studio; this module only builds the prompt
//! and tells the caller where to take it.

use chrono::Utc;
use service::config::Config;

const TOPIC: &str = "Quantum Computing";
const DEFAULT_VISUAL: &str = "abstract quantum states";
pub const ESTIMATED_TIME: &str = "2-3 minutes";

/// Concepts spotted in a transcript, with a visual metaphor for each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPoints {
    pub topic: String,
    pub concepts: Vec<String>,
    pub visual_metaphors: Vec<String>,
}

pub fn extract_key_points(transcript: &str) -> KeyPoints {
    let text = transcript.to_lowercase();
    let mut points = KeyPoints {
        topic: TOPIC.to_string(),
        concepts: Vec::new(),
        visual_metaphors: Vec::new(),
    };

    let rules: [(&[&str], &str, &str); 4] = [
        (&["quantum"], "quantum mechanics", "particles in superposition"),
        (
            &["qubit", "cubit"],
            "qubits",
            "spinning coins showing 0 and 1 simultaneously",
        ),
        (
            &["superposition"],
            "superposition",
            "cat in a box being both alive and dead",
        ),
        (
            &["entanglement"],
            "quantum entanglement",
            "connected particles reacting instantly across distance",
        ),
    ];

    for (keywords, concept, metaphor) in rules {
        if keywords.iter().any(|keyword| text.contains(keyword)) {
            points.concepts.push(concept.to_string());
            points.visual_metaphors.push(metaphor.to_string());
        }
    }

    points
}

/// Eight second storyboard built around the first visual metaphor.
pub fn build_video_prompt(points: &KeyPoints) -> String {
    let visual = points
        .visual_metaphors
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_VISUAL);

    format!(
        r#"Create an engaging 8-second educational video about {topic}:

VISUAL STYLE:
- Clean, modern educational animation
- Blue/purple gradient backgrounds
- Smooth cinematic transitions
- Professional typography

SCENE STRUCTURE:
[0-2s] Title card: "{topic}" with floating particles
[2-4s] Visual: {visual}
[4-6s] Split screen: classical vs quantum computing comparison
[6-8s] "Learn More" call-to-action with futuristic UI

VISUAL ELEMENTS:
- Glowing particles and energy waves
- Holographic displays
- 3D geometric shapes (qubits)
- Floating mathematical equations
- Circuit board patterns
- Light beam animations

MOOD: Inspiring, futuristic, educational
LIGHTING: Dramatic blue/cyan highlights
QUALITY: High-definition, cinematic, 720p"#,
        topic = points.topic,
    )
}

/// A caller supplied prompt wins; otherwise one is derived from the transcript.
/// `None` when there's nothing to work from.
pub fn resolve_prompt(custom_prompt: Option<&str>, transcript: Option<&str>) -> Option<String> {
    match custom_prompt.filter(|prompt| !prompt.trim().is_empty()) {
        Some(prompt) => Some(prompt.to_string()),
        None => transcript
            .filter(|transcript| !transcript.trim().is_empty())
            .map(|transcript| build_video_prompt(&extract_key_points(transcript))),
    }
}

/// Where to render the video and where the output lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPlan {
    pub studio_url: String,
    pub instructions: Vec<String>,
    pub output_path: String,
    pub estimated_time: String,
}

pub fn plan(config: &Config, session_id: &str) -> VideoPlan {
    VideoPlan {
        studio_url: format!(
            "https://console.cloud.google.com/vertex-ai/studio/media/generate?project={}",
            config.video_project_id()
        ),
        instructions: vec![
            "1. Click the Vertex AI Studio link below".to_string(),
            "2. Paste the prompt in the text box".to_string(),
            "3. Click Generate Video".to_string(),
            format!("4. Video will be ready in {ESTIMATED_TIME}"),
        ],
        output_path: format!(
            "gs://{}/{}_{}.mp4",
            config.video_output_bucket(),
            session_id,
            Utc::now().timestamp_millis()
        ),
        estimated_time: ESTIMATED_TIME.to_string(),
    }
}
