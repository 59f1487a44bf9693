use careerai_coach::templates::{FALLBACK_REPLY, INTERVIEW_REPLY, RESUME_REPLY};
use careerai_coach::{KeywordResponder, Responder};

#[test]
fn test_resume_keywords_case_insensitive() {
    for input in ["RESUME help", "Update my Cv please", "resume", "cv"] {
        assert_eq!(KeywordResponder::reply(input), RESUME_REPLY, "input: {input}");
    }
}

#[test]
fn test_interview_prompt_exact() {
    let reply = KeywordResponder::reply("Can you help me prepare for an interview?");
    assert_eq!(
        reply,
        "Interview preparation is crucial! I recommend the STAR method (Situation, Task, Action, Result) for behavioral questions. What type of interview are you preparing for, and what role?"
    );
    assert_eq!(reply, INTERVIEW_REPLY);
}

#[test]
fn test_resume_beats_interview() {
    assert_eq!(KeywordResponder::reply("resume tips for interview"), RESUME_REPLY);
}

#[test]
fn test_hello_falls_back() {
    assert_eq!(KeywordResponder::reply("hello"), FALLBACK_REPLY);
}

#[test]
fn test_blank_input_falls_back() {
    assert_eq!(KeywordResponder::reply(""), FALLBACK_REPLY);
    assert_eq!(KeywordResponder::reply("   \n\t"), FALLBACK_REPLY);
}

#[tokio::test]
async fn test_responder_trait_matches_pure_function() {
    let responder = KeywordResponder::new();
    let input = "How do I negotiate salary?";
    let reply = responder.respond(input).await.unwrap();
    assert_eq!(reply, KeywordResponder::reply(input));
    assert_eq!(responder.name(), "keyword");
}
