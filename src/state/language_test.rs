use super::*;
use crate::test_helpers::memory_store;

#[test]
fn parse_accepts_known_codes() {
    assert_eq!("zh".parse::<Language>(), Ok(Language::Zh));
    assert_eq!(" en ".parse::<Language>(), Ok(Language::En));
}

#[test]
fn parse_rejects_unknown_codes() {
    assert_eq!("fr".parse::<Language>(), Err(UnknownLanguage("fr".to_owned())));
    assert!("".parse::<Language>().is_err());
    assert!("EN".parse::<Language>().is_err());
}

#[test]
fn locale_tags() {
    assert_eq!(Language::Zh.locale_tag(), "zh-CN");
    assert_eq!(Language::En.locale_tag(), "en-US");
}

#[test]
fn no_stored_value_loads_zh() {
    let (store, _) = memory_store();
    let controller = LanguageController::new(store);
    assert_eq!(controller.load_initial_language(), Language::Zh);
    assert_eq!(controller.active(), Language::Zh);
}

#[test]
fn set_language_round_trips_across_boots() {
    let (store, _) = memory_store();
    LanguageController::new(store.clone()).set_language(Language::En);

    let fresh = LanguageController::new(store);
    assert_eq!(fresh.active(), Language::Zh);
    assert_eq!(fresh.load_initial_language(), Language::En);
    assert_eq!(fresh.active(), Language::En);
}

#[test]
fn set_language_broadcasts_invalidation() {
    let (store, _) = memory_store();
    let controller = LanguageController::new(store);
    let mut first = controller.subscribe();
    let mut second = controller.subscribe();

    controller.set_language(Language::En);

    let expected = TranslationsInvalidated { language: Language::En };
    assert_eq!(first.try_recv().unwrap(), expected);
    assert_eq!(second.try_recv().unwrap(), expected);
}

#[test]
fn set_language_without_subscribers_still_persists() {
    let (store, _) = memory_store();
    let controller = LanguageController::new(store.clone());
    controller.set_language(Language::En);
    assert_eq!(store.language(), Language::En);
}

#[test]
fn language_change_survives_logout_clear() {
    let (store, _) = memory_store();
    let controller = LanguageController::new(store.clone());
    controller.set_language(Language::En);
    store.set_token("tok", "alice", false);
    store.clear();
    assert_eq!(LanguageController::new(store).load_initial_language(), Language::En);
}
