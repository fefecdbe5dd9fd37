//! Template patching against realistic card documents

mod common;

use common::{template_svg, template_value};
use profilecard_core::svg::{patch_template_file, PatchValues, TemplateSlots};
use profilecard_core::CoreError;
use tempfile::TempDir;

fn values() -> PatchValues {
    PatchValues {
        age: "21 years, 9 months, 6 days".to_string(),
        repos: "42".to_string(),
        commits: "3,141".to_string(),
    }
}

#[test]
fn test_default_slots_patch_in_place() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("card.svg");
    let original = template_svg(74);
    std::fs::write(&path, &original).unwrap();

    patch_template_file(&path, &TemplateSlots::default(), &values()).unwrap();

    let patched = std::fs::read_to_string(&path).unwrap();
    let expected = original
        .replace(
            &format!(">{}<", template_value(38)),
            ">21 years, 9 months, 6 days<",
        )
        .replace(&format!(">{}<", template_value(71)), ">42<")
        .replace(&format!(">{}<", template_value(73)), ">3,141<");
    assert_eq!(patched, expected);

    // Neighbours untouched
    assert!(patched.contains(&format!(">{}<", template_value(37))));
    assert!(patched.contains(&format!(">{}<", template_value(72))));
}

#[test]
fn test_repatching_is_stable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("card.svg");
    std::fs::write(&path, template_svg(90)).unwrap();

    patch_template_file(&path, &TemplateSlots::default(), &values()).unwrap();
    let first = std::fs::read_to_string(&path).unwrap();
    patch_template_file(&path, &TemplateSlots::default(), &values()).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
}

#[test]
fn test_short_template_is_rejected_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("card.svg");
    let original = template_svg(73);
    std::fs::write(&path, &original).unwrap();

    let err = patch_template_file(&path, &TemplateSlots::default(), &values()).unwrap_err();

    match err {
        CoreError::TemplateMismatch {
            path: reported,
            expected,
            found,
        } => {
            assert_eq!(reported, path);
            assert_eq!(expected, "at least 74 tspan elements");
            assert_eq!(found, "73");
        }
        other => panic!("expected TemplateMismatch, got {:?}", other),
    }
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_custom_slots() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("card.svg");
    std::fs::write(&path, template_svg(10)).unwrap();
    let slots = TemplateSlots {
        age: 0,
        repos: 5,
        commits: 9,
    };

    patch_template_file(&path, &slots, &values()).unwrap();

    let patched = std::fs::read_to_string(&path).unwrap();
    assert!(patched.contains(">21 years, 9 months, 6 days<"));
    assert!(!patched.contains(&format!(">{}<", template_value(5))));
    assert!(patched.contains(&format!(">{}<", template_value(8))));
}

#[test]
fn test_missing_template_is_read_error() {
    let dir = TempDir::new().unwrap();
    let err = patch_template_file(
        &dir.path().join("missing.svg"),
        &TemplateSlots::default(),
        &values(),
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::FileRead { .. }));
}
