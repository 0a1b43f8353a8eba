use std::fs;
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::TempDir;

use faq_core::config::Settings;
use faq_core::protocol::Session;

const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

struct Fixture {
    dir: TempDir,
    session: Session,
}

fn fixture(debounce_ms: u64) -> Fixture {
    let dir = TempDir::new().unwrap();
    let assets = dir.path().join("assets");
    fs::create_dir_all(&assets).unwrap();

    fs::write(
        assets.join("faqs.en.json"),
        json!({
            "faqs": [
                { "id": "a", "category": "Power", "subcategory": "Startup", "question": "Controller does not boot",
                  "solutionSteps": ["Check the 24V supply"], "errorCodes": ["E101"] },
                { "id": "b", "category": "Motion", "question": "Motor stall", "errorCodes": ["E204"] }
            ]
        })
        .to_string(),
    )
    .unwrap();
    fs::write(
        assets.join("faqs.th.json"),
        json!({ "faqs": [ { "id": "t", "category": "Power", "question": "เปิดเครื่องไม่ได้" } ] }).to_string(),
    )
    .unwrap();

    let mut settings = Settings::default();
    settings.data.source = assets.to_string_lossy().to_string();
    settings.storage.dir = dir.path().join("storage").to_string_lossy().to_string();
    settings.browse.debounce_ms = debounce_ms;

    Fixture {
        session: Session::new(settings),
        dir,
    }
}

fn call(session: &mut Session, cmd: &str, payload: Value) -> Value {
    let line = json!({ "id": 7, "cmd": cmd, "payload": payload }).to_string();
    serde_json::from_str(&session.handle(&line)).unwrap()
}

fn ok_payload(session: &mut Session, cmd: &str, payload: Value) -> Value {
    let resp = call(session, cmd, payload);
    assert_eq!(resp["status"], "ok", "{cmd}: {resp}");
    assert_eq!(resp["id"], 7);
    resp["payload"].clone()
}

#[test]
fn rejects_invalid_and_unknown_requests() {
    let mut f = fixture(200);
    let resp: Value = serde_json::from_str(&f.session.handle("{ nope")).unwrap();
    assert_eq!(resp["message"], "invalid json");

    let resp = call(&mut f.session, "frobnicate", json!({}));
    assert_eq!(resp["status"], "error");
    assert_eq!(resp["message"], "unknown command");

    let resp = call(&mut f.session, "browse.view", json!({}));
    assert_eq!(resp["status"], "error");
    assert_eq!(resp["message"], "dataset not loaded");

    assert_eq!(ok_payload(&mut f.session, "ping", json!({}))["message"], "faq-core alive");
}

#[test]
fn load_search_and_copy() {
    let mut f = fixture(200);
    let loaded = ok_payload(&mut f.session, "dataset.load", json!({ "lang": "en" }));
    assert_eq!(loaded["count"], 2);

    let view = ok_payload(&mut f.session, "browse.query", json!({ "query": "e204" }));
    assert_eq!(view["resultCount"], 1);
    assert_eq!(view["visible"][0]["id"], "b");

    let view = ok_payload(&mut f.session, "browse.query", json!({ "query": "nothing matches this" }));
    assert_eq!(view["resultCount"], 0);
    assert_eq!(view["toc"]["categories"].as_array().unwrap().len(), 2);

    let copied = ok_payload(&mut f.session, "browse.copy", json!({ "faqId": "a" }));
    assert_eq!(
        copied["text"],
        "Q: Controller does not boot\nSolution Steps:\n1. Check the 24V supply\nError Codes: E101"
    );

    let resp = call(&mut f.session, "browse.jump", json!({}));
    assert_eq!(resp["message"], "payload.faqId is required");
}

#[test]
fn filter_and_toggle() {
    let mut f = fixture(200);
    ok_payload(&mut f.session, "dataset.load", json!({ "lang": "en" }));

    let view = ok_payload(&mut f.session, "browse.filter", json!({ "category": "Power", "subcategory": "" }));
    assert_eq!(view["resultCount"], 1);
    assert_eq!(view["activeFilter"], "Power");

    let view = ok_payload(&mut f.session, "browse.toggle", json!({ "faqId": "a" }));
    assert_eq!(view["visible"][0]["expanded"], true);

    let view = ok_payload(&mut f.session, "browse.reset", json!({}));
    assert_eq!(view["resultCount"], 2);
    assert_eq!(view["activeFilter"], "");
}

#[test]
fn language_switch_replaces_dataset_and_is_remembered() {
    let mut f = fixture(200);
    ok_payload(&mut f.session, "dataset.load", json!({ "lang": "en" }));
    let loaded = ok_payload(&mut f.session, "dataset.load", json!({ "lang": "th" }));
    assert_eq!(loaded["count"], 1);
    assert_eq!(ok_payload(&mut f.session, "lang.get", json!({}))["lang"], "th");

    let view = ok_payload(&mut f.session, "browse.view", json!({}));
    assert_eq!(view["lang"], "th");
    assert_eq!(view["visible"][0]["id"], "t");

    // a failed load keeps the previous dataset
    let resp = call(&mut f.session, "dataset.load", json!({ "lang": "zh" }));
    assert_eq!(resp["status"], "error");
    let view = ok_payload(&mut f.session, "browse.view", json!({}));
    assert_eq!(view["visible"][0]["id"], "t");

    let resp = call(&mut f.session, "lang.set", json!({ "lang": "fr" }));
    assert_eq!(resp["message"], "unknown language: fr");
}

#[test]
fn debounced_input_fires_after_quiet_period() {
    let mut f = fixture(20);
    ok_payload(&mut f.session, "dataset.load", json!({ "lang": "en" }));

    ok_payload(&mut f.session, "browse.input", json!({ "query": "mo" }));
    ok_payload(&mut f.session, "browse.input", json!({ "query": "motor" }));

    thread::sleep(Duration::from_millis(60));
    let tick = ok_payload(&mut f.session, "browse.tick", json!({}));
    assert_eq!(tick["fired"], true);
    assert_eq!(tick["view"]["query"], "motor");
    assert_eq!(tick["view"]["resultCount"], 1);

    let tick = ok_payload(&mut f.session, "browse.tick", json!({}));
    assert_eq!(tick["fired"], false);
    assert_eq!(tick["pending"], false);
}

#[test]
fn authoring_round_trip() {
    let mut f = fixture(200);
    let image = f.dir.path().join("wiring.png");
    fs::write(&image, PNG_HEADER).unwrap();

    let resp = call(&mut f.session, "admin.select", json!({ "faqId": "a" }));
    assert_eq!(resp["message"], "authoring session not loaded");

    let opened = ok_payload(&mut f.session, "admin.open", json!({ "lang": "en" }));
    assert_eq!(opened["records"].as_array().unwrap().len(), 2);
    assert_eq!(opened["selected"], "a");

    ok_payload(&mut f.session, "admin.select", json!({ "faqId": "b" }));
    ok_payload(&mut f.session, "admin.stage_image", json!({ "path": image.to_string_lossy() }));
    let added = ok_payload(
        &mut f.session,
        "admin.add_image",
        json!({ "imageId": "img-wiring", "caption": "Wiring" }),
    );
    assert_eq!(added["images"][0]["id"], "img-wiring");
    assert_eq!(added["images"][0]["caption"], "Wiring");

    ok_payload(&mut f.session, "admin.save_draft", json!({}));
    ok_payload(&mut f.session, "admin.remove_image", json!({ "imageId": "img-wiring" }));
    let restored = ok_payload(&mut f.session, "admin.load_draft", json!({}));
    assert_eq!(restored["status"], "draft loaded");

    let out = f.dir.path().join("export").join("faqs.en.json");
    let exported = ok_payload(&mut f.session, "admin.export", json!({ "path": out.to_string_lossy() }));
    assert_eq!(exported["status"], format!("exported {}", out.display()));

    let written: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["faqs"][1]["images"][0]["id"], "img-wiring");
    assert!(written["faqs"][1]["images"][0]["dataUrl"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    assert!(written["meta"]["lastUpdated"].is_string());
}

#[test]
fn drafts_stay_with_their_language() {
    let mut f = fixture(200);
    let assets = f.dir.path().join("assets");

    ok_payload(&mut f.session, "admin.open", json!({ "lang": "en" }));
    ok_payload(&mut f.session, "admin.save_draft", json!({}));

    let opened = ok_payload(&mut f.session, "admin.open", json!({ "lang": "th" }));
    assert_eq!(opened["selected"], "t");
    let loaded = ok_payload(&mut f.session, "admin.load_draft", json!({}));
    assert_eq!(loaded["status"], "no draft to load");
    assert_eq!(loaded["selected"], "t");

    // default target is the dataset file under the configured source
    let exported = ok_payload(&mut f.session, "admin.export", json!({}));
    let th_path = assets.join("faqs.th.json");
    assert_eq!(exported["path"], &*th_path.to_string_lossy());

    let written: Value = serde_json::from_str(&fs::read_to_string(&th_path).unwrap()).unwrap();
    assert_eq!(written["faqs"][0]["id"], "t");
    assert_eq!(written["faqs"].as_array().unwrap().len(), 1);

    ok_payload(&mut f.session, "admin.open", json!({ "lang": "en" }));
    let loaded = ok_payload(&mut f.session, "admin.load_draft", json!({}));
    assert_eq!(loaded["status"], "draft loaded");
    assert_eq!(loaded["selected"], "a");
}
