//! End-to-end navigation behaviour
//!
//! Drives the state machine the way a page subscription does: channel
//! messages go through the adapter, local interactions are applied directly,
//! and content lookups use the store the pages render from.

use nafm_common::content::ContentStore;
use nafm_common::events::{to_input, ChannelMessage, ChannelSignal};
use nafm_common::navigation::{
    Effect, NavigationMachine, Outcome, Page, PageKind, PageQuery, SelectionContext,
    TransitionInput,
};
use nafm_common::{Error, ObjectId, RfidTable, SectionId, YearRange};

const CONTENT: &str = r#"{
    "sections": [
        {
            "id": "naf-history",
            "title": "NAF History",
            "year-ranges": [
                {"1962-1971": [
                    {"year": "1964", "title": "Founding"},
                    {"year": "1968", "title": "First squadron"}
                ]},
                {"1972-1981": [
                    {"year": "1975", "title": "Expansion"}
                ]}
            ]
        },
        {
            "id": "nafsfa-history",
            "title": "NAFSFA History",
            "years": [{"year": "1980", "title": "School opened"}]
        }
    ]
}"#;

fn range(s: &str) -> YearRange {
    s.parse().unwrap()
}

fn signal(signal: ChannelSignal) -> TransitionInput {
    to_input(ChannelMessage::Signal(signal))
}

/// One machine parked on each page
fn every_page() -> Vec<NavigationMachine> {
    let table = RfidTable::canonical();
    let mut machines = Vec::new();

    let mut m = NavigationMachine::new();
    machines.push(m.clone());

    m.apply(TransitionInput::ObjectPicked { object: "naf".into() }, &table);
    machines.push(m.clone());

    m.apply(
        signal(ChannelSignal::YearDropped {
            year: "1962-1971".into(),
            object: "naf".into(),
        }),
        &table,
    );
    machines.push(m.clone());

    m.apply(TransitionInput::YearCardClicked { year: 1968 }, &table);
    machines.push(m);

    machines
}

#[test]
fn test_every_page_reachable() {
    let kinds: Vec<PageKind> = every_page().iter().map(|m| m.page_kind()).collect();
    assert_eq!(
        kinds,
        vec![
            PageKind::Landing,
            PageKind::Section,
            PageKind::YearList,
            PageKind::YearDetail
        ]
    );
}

#[test]
fn test_resolver_totality() {
    let table = RfidTable::canonical();
    let expected = [
        ("D3 2F 29 14", "1962-1971"),
        ("33 18 E3 13", "1972-1981"),
        ("D3 AB 07 2D", "1982-1991"),
        ("CA D3 42 00", "1992-2001"),
        ("D3 4F E6 0C", "2002-2011"),
        ("53 AA DB 13", "2012-2021"),
        ("D3 21 39 DD", "2022-2031"),
    ];
    for (uid, r) in expected {
        assert_eq!(table.resolve(uid), Some(range(r)));
        assert_eq!(table.resolve(&uid.to_lowercase()), Some(range(r)));
        assert_eq!(table.resolve(&format!("  {}  ", uid)), Some(range(r)));
    }
    assert_eq!(table.resolve("DE AD BE EF"), None);
    assert_eq!(table.resolve(""), None);
}

#[test]
fn test_gating_invariant() {
    let table = RfidTable::canonical();
    let mut m = NavigationMachine::new();
    m.apply(TransitionInput::ObjectPicked { object: "nafsfa".into() }, &table);
    m.apply(
        signal(ChannelSignal::YearDropped {
            year: "1972-1981".into(),
            object: "nafsfa".into(),
        }),
        &table,
    );
    assert!(m.is_year_range_detected());

    // Fresh year list with no range yet
    let url = PageQuery {
        section: Some("nafsfa-history".into()),
        ..Default::default()
    }
    .page_url(PageKind::YearList, &table)
    .unwrap();
    let mut waiting = NavigationMachine::from_url(&url);
    assert!(!waiting.is_year_range_detected());

    let t = waiting.apply(TransitionInput::YearCardClicked { year: 1975 }, &table);
    assert!(matches!(t.outcome, Outcome::Rejected(Error::InvalidTransition(_))));
    assert!(t.effects.is_empty());
    assert_eq!(waiting.page_kind(), PageKind::YearList);
}

#[test]
fn test_reset_completeness_from_every_page() {
    let table = RfidTable::canonical();
    for mut m in every_page() {
        let t = m.apply(
            signal(ChannelSignal::ObjectDropped {
                message: "Object removed".into(),
            }),
            &table,
        );
        assert!(t.is_accepted());
        assert_eq!(m.state(), Page::Landing);
        assert_eq!(*m.context(), SelectionContext::empty());
    }
}

#[test]
fn test_system_reset_clears_like_object_drop() {
    let table = RfidTable::canonical();
    let mut m = every_page().pop().unwrap();
    let t = m.apply(
        signal(ChannelSignal::SystemReset {
            message: "System reset".into(),
        }),
        &table,
    );
    assert_eq!(t.navigation().unwrap().to_string(), "/");
    assert!(m.context().is_empty());
}

#[test]
fn test_bounds_checking() {
    let table = RfidTable::canonical();
    let detail = |year: i32| {
        let url = PageQuery {
            section: Some("naf-history".into()),
            object: Some("naf".into()),
            range: Some("1962-1971".into()),
            year: Some(year.to_string()),
            hint: None,
        }
        .page_url(PageKind::YearDetail, &table)
        .unwrap();
        NavigationMachine::from_url(&url)
    };

    let mut first = detail(1962);
    let t = first.apply(TransitionInput::PreviousYear, &table);
    assert!(t.is_rejected());
    assert!(t.navigation().is_none());
    assert_eq!(first.context().year, Some(1962));

    let mut last = detail(1971);
    let t = last.apply(TransitionInput::NextYear, &table);
    assert!(t.is_rejected());
    assert!(t.navigation().is_none());
    assert_eq!(last.context().year, Some(1971));

    let mut middle = detail(1966);
    let t = middle.clone().apply(TransitionInput::PreviousYear, &table);
    assert_eq!(
        t.navigation().unwrap().to_string(),
        "/year-detail?section=naf-history&object=naf&range=1962-1971&year=1965"
    );
    let t = middle.apply(TransitionInput::NextYear, &table);
    assert_eq!(
        t.navigation().unwrap().to_string(),
        "/year-detail?section=naf-history&object=naf&range=1962-1971&year=1967"
    );
}

#[test]
fn test_tag_detected_on_section_opens_year_list() {
    let table = RfidTable::canonical();
    let store = ContentStore::from_json_str(CONTENT).unwrap();
    let mut m = NavigationMachine::new();
    m.apply(TransitionInput::ObjectPicked { object: "naf".into() }, &table);
    assert_eq!(
        m.state(),
        Page::SectionOverview {
            section: SectionId::NafHistory
        }
    );

    let t = m.apply(
        signal(ChannelSignal::RfidDetected {
            uid: "D3 2F 29 14".into(),
            object: "naf".into(),
        }),
        &table,
    );
    assert!(t.is_accepted());
    assert!(t
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Emit(_))));

    let detected = range("1962-1971");
    assert_eq!(
        m.state(),
        Page::YearList {
            section: SectionId::NafHistory,
            range: Some(detected)
        }
    );

    // One card per year, real where authored and synthesized elsewhere
    let section = store.section(SectionId::NafHistory).unwrap();
    let cards: Vec<_> = detected
        .years()
        .map(|year| section.entry_or_generic(Some(&detected), year))
        .collect();
    assert_eq!(cards.len(), 10);
    assert_eq!(cards.iter().filter(|c| !c.generic).count(), 2);
    assert_eq!(cards[2].title, "Founding");
    assert_eq!(cards[0].title, "Year 1962");
}

#[test]
fn test_year_dropped_at_landing_ignored() {
    let table = RfidTable::canonical();
    let mut m = NavigationMachine::new();
    let t = m.apply(
        signal(ChannelSignal::YearDropped {
            year: "1973-1982".into(),
            object: "naf".into(),
        }),
        &table,
    );
    assert!(t.is_rejected());
    assert!(t.effects.is_empty());
    assert_eq!(m.state(), Page::Landing);
}

#[test]
fn test_generic_fallback_totality() {
    let store = ContentStore::from_json_str(CONTENT).unwrap();
    let table = RfidTable::canonical();
    for section_id in [SectionId::NafHistory, SectionId::NafsfaHistory] {
        let section = store.section(section_id).unwrap();
        for r in table.ranges() {
            for year in r.years() {
                let entry = section.entry_or_generic(Some(&r), year);
                assert!(!entry.title.is_empty());
                assert!(entry.generic || entry.year == Some(year));
                if entry.generic {
                    assert!(!entry.summary.is_empty());
                }
            }
        }
    }
}

#[test]
fn test_partition_isolation_in_year_list() {
    let store = ContentStore::from_json_str(CONTENT).unwrap();
    let section = store.section(SectionId::NafHistory).unwrap();
    let other = range("1962-1971");
    assert!(section.find_year_entry(1975).is_some());
    assert!(section.find_year_entry_in_range(&other, 1975).is_none());
}

#[test]
fn test_return_to_section_clears_range() {
    let table = RfidTable::canonical();
    let mut m = every_page().remove(2);
    let t = m.apply(
        signal(ChannelSignal::ReturnToSection {
            object: "naf".into(),
            message: "Year range not recognised".into(),
        }),
        &table,
    );
    assert_eq!(
        t.navigation().unwrap().to_string(),
        "/section?section=naf-history&object=naf"
    );
    assert_eq!(m.context().picked_object, Some(ObjectId::Naf));
    assert_eq!(m.context().year_range, None);
}

#[test]
fn test_object_pick_on_section_ignored() {
    let table = RfidTable::canonical();
    let mut m = every_page().remove(1);
    let t = m.apply(
        signal(ChannelSignal::ObjectPicked {
            object: "evol".into(),
        }),
        &table,
    );
    assert!(t.is_rejected());
    assert_eq!(m.context().section_id, Some(SectionId::NafHistory));
}
