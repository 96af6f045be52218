// 集成测试：数据库 → 索引 → 检索的完整流程

use crate::db;
use crate::retrieval::*;

fn seed_nutrition_db() -> rusqlite::Connection {
    let conn = db::init_memory_db().unwrap();
    let sections = [
        (
            "Calories",
            "A calorie is a unit of energy. Foods provide calories from carbohydrates, fats and proteins.",
        ),
        (
            "Water",
            "Water makes up about sixty percent of body weight and regulates body temperature.",
        ),
        (
            "Fiber",
            "Dietary fiber is found in whole grains, fruits and vegetables and supports digestion.",
        ),
        (
            "Vitamin C",
            "Vitamin C is found in citrus fruits and is needed to make collagen.",
        ),
    ];
    for (title, text) in sections {
        db::insert_document(&conn, title, text, Some("nutrition.md")).unwrap();
    }
    conn
}

#[test]
fn test_full_pipeline_finds_relevant_section() {
    let conn = seed_nutrition_db();
    let retriever = Retriever::from_connection(&conn, ContextSelector::default()).unwrap();
    assert_eq!(retriever.len(), 4);

    let contexts = retriever.get_contexts(&conn, "What is a calorie?").unwrap();
    assert!(!contexts.is_empty());
    assert_eq!(contexts[0].title, "Calories");
    assert!(contexts[0].text.contains("unit of energy"));
}

#[test]
fn test_shared_term_ranks_both_sections() {
    let conn = seed_nutrition_db();
    let retriever = Retriever::from_connection(&conn, ContextSelector::new(5, 1.0)).unwrap();

    // fruits 同时出现在 Fiber 和 Vitamin C 中
    let scores = retriever.get_scores("fruits");
    assert_eq!(scores.len(), 2);

    let contexts = retriever.get_contexts(&conn, "fruits").unwrap();
    let titles: Vec<&str> = contexts.iter().map(|c| c.title.as_str()).collect();
    assert!(titles.contains(&"Fiber"));
    assert!(titles.contains(&"Vitamin C"));
}

#[test]
fn test_no_match_returns_empty() {
    let conn = seed_nutrition_db();
    let retriever = Retriever::from_connection(&conn, ContextSelector::default()).unwrap();
    assert!(retriever.get_contexts(&conn, "quantum chromodynamics").unwrap().is_empty());
}

#[test]
fn test_deleted_document_is_skipped() {
    let conn = seed_nutrition_db();
    let retriever = Retriever::from_connection(&conn, ContextSelector::default()).unwrap();
    db::clear_documents(&conn).unwrap();

    let contexts = retriever.get_contexts(&conn, "What is a calorie?").unwrap();
    assert!(contexts.is_empty());
}

#[test]
fn test_empty_database() {
    let conn = db::init_memory_db().unwrap();
    let retriever = Retriever::from_connection(&conn, ContextSelector::default()).unwrap();
    assert!(retriever.is_empty());
    assert!(retriever.get_contexts(&conn, "calorie").unwrap().is_empty());
}

#[test]
fn test_shared_connection_store() {
    let conn = seed_nutrition_db();
    let retriever = Retriever::from_connection(&conn, ContextSelector::default()).unwrap();
    let store = std::sync::Mutex::new(conn);

    let contexts = retriever.get_contexts(&store, "What is a calorie?").unwrap();
    assert_eq!(contexts[0].title, "Calories");
    assert!(store.try_lock().is_ok());
}
