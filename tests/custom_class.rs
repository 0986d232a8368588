// ============================================================================
// mustable - Custom Class Integration Tests
// A user-defined wrapped class exercising every member shape
// ============================================================================

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use mustable::{
    shallow_same, snapshot_args, Facade, MemberBinding, MemberTable, MemberTableBuilder, Mustable,
    MustableOptions, MustableRegistry, Snapshot, SnapshotArgs,
};

// =============================================================================
// A document model: one member of every shape
// =============================================================================

struct Document {
    title: String,
    rating: u32,
    sections: Vec<String>,
    on_change: Box<dyn Fn(&str) -> String>,
    scratch: String,
}

impl Document {
    fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            title: String::new(),
            rating: 0,
            sections: Vec::new(),
            on_change: Box::new(|s| s.to_uppercase()),
            scratch: String::new(),
        }))
    }

    fn set_rating(&mut self, rating: u32) {
        self.rating = rating.min(5);
    }

    fn word_count(&self) -> usize {
        self.sections.iter().map(|s| s.split_whitespace().count()).sum()
    }

    fn title_snapshot(instance: &dyn Any, _args: &SnapshotArgs) -> Snapshot {
        let Some(doc) = instance.downcast_ref::<Self>() else {
            return Snapshot::Absent;
        };
        Snapshot::Text(doc.title.clone())
    }

    fn rating_snapshot(instance: &dyn Any, _args: &SnapshotArgs) -> Snapshot {
        let Some(doc) = instance.downcast_ref::<Self>() else {
            return Snapshot::Absent;
        };
        Snapshot::from(doc.rating)
    }
}

impl Mustable for Document {
    fn define_members(builder: MemberTableBuilder) -> MemberTable {
        builder
            // Plain data field
            .mustable_with(
                "title",
                MemberBinding::Value,
                MustableOptions::new()
                    .snapshot(Document::title_snapshot)
                    .comparer(shallow_same),
            )
            // Accessor-backed property (setter clamps)
            .mustable_with(
                "rating",
                MemberBinding::Accessor { get: true, set: true },
                MustableOptions::new()
                    .snapshot(Document::rating_snapshot)
                    .comparer(shallow_same),
            )
            // Method, no cheap snapshot
            .mustable("append_section", MemberBinding::Invocable)
            // Function-valued field whose invocation is the mutating event
            .mustable_with(
                "on_change",
                MemberBinding::Value,
                MustableOptions::new().mustable_fn(),
            )
            // Getter-only accessor: unclassifiable, stays pass-through
            .mustable("word_count", MemberBinding::Accessor { get: true, set: false })
            // Deliberately untracked
            .immustable("scratch")
            .build()
    }
}

fn wrapped() -> (MustableRegistry, Rc<Facade<Document>>) {
    let registry = MustableRegistry::new();
    let facade = registry.register(&Document::new(), true);
    (registry, facade)
}

// =============================================================================
// TESTS
// =============================================================================

#[test]
fn field_write_bumps_only_on_change() {
    let (_registry, doc) = wrapped();

    doc.assign("title", SnapshotArgs::none(), |d| d.title = "Intro".into());
    assert_eq!(doc.version(), 1);

    // Same value back: suppressed, state still written
    doc.assign("title", SnapshotArgs::none(), |d| d.title = "Intro".into());
    assert_eq!(doc.version(), 1);
    assert_eq!(doc.read(|d| d.title.clone()), "Intro");
}

#[test]
fn property_setter_effect_decides_the_bump() {
    let (_registry, doc) = wrapped();

    doc.assign("rating", SnapshotArgs::none(), |d| d.set_rating(4));
    assert_eq!(doc.version(), 1);
    assert_eq!(doc.read(|d| d.rating), 4);

    // The setter clamps 9 to 5, a real change from 4
    doc.assign("rating", SnapshotArgs::none(), |d| d.set_rating(9));
    assert_eq!(doc.version(), 2);
    assert_eq!(doc.read(|d| d.rating), 5);

    // Clamped to the same 5: suppressed
    doc.assign("rating", SnapshotArgs::none(), |d| d.set_rating(7));
    assert_eq!(doc.version(), 2);
}

#[test]
fn snapshotless_method_always_bumps() {
    let (_registry, doc) = wrapped();

    doc.invoke("append_section", SnapshotArgs::none(), |d| {
        d.sections.push("one two three".into());
    });
    doc.invoke("append_section", SnapshotArgs::none(), |d| {
        d.sections.push(String::new());
    });
    assert_eq!(doc.version(), 2);
}

#[test]
fn mustable_fn_field_bumps_on_invocation() {
    let (_registry, doc) = wrapped();

    let shouted = doc.invoke("on_change", snapshot_args!["hi".to_string()], |d| {
        (d.on_change)("hi")
    });
    assert_eq!(shouted, Some("HI".to_string()));
    assert_eq!(doc.version(), 1);
}

#[test]
fn getter_only_member_stays_pass_through() {
    let (_registry, doc) = wrapped();

    let words = doc.invoke("word_count", SnapshotArgs::none(), |d| d.word_count());
    assert_eq!(words, Some(0));
    assert_eq!(doc.version(), 0);

    // The skip is visible in the member table
    let table = doc.member_table();
    assert!(table.descriptor("word_count").is_none());
    assert!(!table.is_classified("word_count"));
}

#[test]
fn audit_marker_writes_no_descriptor() {
    let (_registry, doc) = wrapped();
    let table = doc.member_table();

    assert!(table.descriptor("scratch").is_none());
    assert!(table.is_classified("scratch"));

    doc.assign("scratch", SnapshotArgs::none(), |d| d.scratch = "tmp".into());
    assert_eq!(doc.version(), 0);
}

#[test]
fn every_member_is_accounted_for() {
    let (_registry, doc) = wrapped();
    let table = doc.member_table();

    for member in ["title", "rating", "append_section", "on_change"] {
        assert!(table.descriptor(member).is_some(), "missing {member}");
    }
    assert_eq!(table.mustable_count(), 4);
    assert_eq!(table.pass_through_members(), ["scratch"]);
}

#[test]
fn reads_are_untracked() {
    let (_registry, doc) = wrapped();

    doc.assign("title", SnapshotArgs::none(), |d| d.title = "Draft".into());
    let version = doc.version();

    let title = doc.read(|d| d.title.clone());
    let words = doc.read(|d| d.word_count());
    assert_eq!(title, "Draft");
    assert_eq!(words, 0);
    assert_eq!(doc.version(), version);
}
