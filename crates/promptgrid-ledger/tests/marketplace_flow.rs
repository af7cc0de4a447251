//! End-to-end exercise of the ledger: mint, fee update, purchase, rating,
//! pagination, and deactivation, all against one shared ledger instance.

use promptgrid_core::{AccountId, PromptKind, TokenId, VerificationKey, Wei};
use promptgrid_ledger::{Ledger, LedgerConfig, LedgerError, LedgerEvent};

fn account(byte: u8) -> AccountId {
    AccountId::from_bytes([byte; 32])
}

fn new_ledger() -> Ledger {
    Ledger::new(LedgerConfig {
        owner: account(0xaa),
        treasury: account(0xbb),
        verification_key: VerificationKey::from_bytes([0x9a; 32]),
    })
}

#[test]
fn creator_mints_buyer_purchases_and_rates() {
    let mut ledger = new_ledger();
    let owner = account(0xaa);
    let creator = account(0x11);
    let buyer = account(0x22);

    // The owner re-tiers the text fee to 0.005 whole units.
    ledger
        .update_listing_fee(owner, PromptKind::Text, Wei::from_milliether(5))
        .unwrap();

    // Creator mints a text prompt, paying exactly the fee.
    let price = Wei::from_milliether(100); // 0.1
    let event = ledger
        .create_prompt(
            creator,
            PromptKind::Text,
            "Describe a city where nature and technology merged".to_string(),
            "Creative Writing".to_string(),
            price,
            r#"{"name":"Creative Writing","description":"A test prompt"}"#.to_string(),
            Wei::from_milliether(5),
        )
        .unwrap();
    let LedgerEvent::PromptCreated { token_id, .. } = event else {
        panic!("expected PromptCreated, got {event:?}");
    };
    assert_eq!(token_id, TokenId(0));
    assert_eq!(ledger.token_id_counter(), TokenId(1));
    assert_eq!(ledger.proceeds_of(account(0xbb)), Wei::from_milliether(5));

    // Buyer pays the exact price.
    ledger.purchase_prompt(buyer, token_id, price).unwrap();
    assert!(ledger.has_purchased(buyer, token_id));
    assert_eq!(ledger.proceeds_of(creator), price);

    // Buyer rates 5 stars.
    ledger
        .rate_prompt(buyer, token_id, 5, "Great".to_string())
        .unwrap();
    assert_eq!(ledger.average_rating(token_id), 50);
    assert_eq!(ledger.rating_count(token_id), 1);

    // Details reflect everything and nothing else changed.
    let token = ledger.prompt_details(token_id).unwrap();
    assert_eq!(token.kind, PromptKind::Text);
    assert_eq!(token.price, price);
    assert_eq!(token.creator, creator);
    assert!(token.active);
}

#[test]
fn rating_pages_are_chronological_aligned_sequences() {
    let mut ledger = new_ledger();
    let creator = account(0x11);
    let fee = ledger.listing_fee(PromptKind::Image);
    let event = ledger
        .create_prompt(
            creator,
            PromptKind::Image,
            "A neon skyline".to_string(),
            "Cityscapes".to_string(),
            Wei(10),
            String::new(),
            fee,
        )
        .unwrap();
    let token_id = event.token_id().unwrap();

    for (i, stars) in [5u8, 3, 4].into_iter().enumerate() {
        let rater = account(0x30 + i as u8);
        ledger.purchase_prompt(rater, token_id, Wei(10)).unwrap();
        ledger
            .rate_prompt(rater, token_id, stars, format!("review {i}"))
            .unwrap();
    }

    let page = ledger.prompt_ratings(token_id, 1, 10);
    assert_eq!(page.stars, vec![3, 4]);
    assert_eq!(page.raters, vec![account(0x31), account(0x32)]);
    assert_eq!(page.reviews.len(), 2);
    assert_eq!(page.timestamps.len(), 2);

    let empty = ledger.prompt_ratings(token_id, 5, 10);
    assert!(empty.is_empty());

    assert_eq!(ledger.average_rating(token_id), 40);
}

#[test]
fn deactivation_closes_the_market_but_not_the_record() {
    let mut ledger = new_ledger();
    let creator = account(0x11);
    let buyer = account(0x22);
    let fee = ledger.listing_fee(PromptKind::Video);
    let event = ledger
        .create_prompt(
            creator,
            PromptKind::Video,
            "A drone shot over the bay".to_string(),
            "Footage".to_string(),
            Wei(500),
            String::new(),
            fee,
        )
        .unwrap();
    let token_id = event.token_id().unwrap();

    ledger.deactivate_prompt(creator, token_id).unwrap();

    let err = ledger.purchase_prompt(buyer, token_id, Wei(500)).unwrap_err();
    assert_eq!(err, LedgerError::PromptInactive(token_id));

    let token = ledger.prompt_details(token_id).unwrap();
    assert!(!token.active);
    assert_eq!(token.content, "A drone shot over the bay");
}

#[test]
fn verification_key_gates_the_metadata_pointer() {
    let mut ledger = new_ledger();
    let fee = ledger.listing_fee(PromptKind::Text);
    let event = ledger
        .create_prompt(
            account(0x11),
            PromptKind::Text,
            "body".to_string(),
            "name".to_string(),
            Wei(1),
            "ipfs://QmPointer".to_string(),
            fee,
        )
        .unwrap();
    let token_id = event.token_id().unwrap();

    let bytes = ledger
        .data_for_token_id(token_id, VerificationKey::from_bytes([0x9a; 32]))
        .unwrap();
    assert_eq!(bytes, b"ipfs://QmPointer");

    assert!(
        ledger
            .data_for_token_id(token_id, VerificationKey::zero())
            .is_err()
    );
}
