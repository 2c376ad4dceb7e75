use annotator_reconcile::{
    Board, Container, DropOutcome, DropZone, Notifier, ReconciliationStatus, TokenId, TokenKind,
    ZoneId,
};
use proptest::prelude::*;

struct AlwaysYes;

impl Notifier for AlwaysYes {
    fn alert(&mut self, _message: &str) {}

    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

fn drop_token(board: &mut Board, token: &TokenId, zone: ZoneId) -> DropOutcome {
    let transfer = board.begin_drag(token).unwrap();
    board.drop_on(transfer, zone, &mut AlwaysYes).unwrap()
}

/// New items, unknown items and three links, all pairwise disjoint
fn reconciler_board() -> (Board, Vec<ZoneId>, Vec<TokenId>) {
    let mut board = Board::new();
    let mut zones = vec![
        board.add_zone(DropZone::multi("new").with_status(ReconciliationStatus::New)),
        board.add_zone(DropZone::multi("unknown").with_status(ReconciliationStatus::Unknown)),
    ];
    for i in 0..3 {
        let link = board.add_zone(
            DropZone::single(format!("link {i}")).with_status(ReconciliationStatus::Linked),
        );
        for other in &zones {
            board.make_disjoint(link, *other).unwrap();
        }
        zones.push(link);
    }
    board.make_disjoint(zones[0], zones[1]).unwrap();

    let tokens = (1..=4)
        .map(|i| board.add_token(TokenKind::Tagged, i.to_string(), format!("entity {i}")).unwrap())
        .collect();
    (board, zones, tokens)
}

proptest! {
    #[test]
    fn test_disjoint_exclusivity_over_drop_sequences(
        drops in prop::collection::vec((0usize..4, 0usize..5), 1..200)
    ) {
        let (mut board, zones, tokens) = reconciler_board();

        for (token, zone) in drops {
            drop_token(&mut board, &tokens[token], zones[zone]);

            for token in &tokens {
                let holders = board.zones_containing(token);
                prop_assert!(holders.len() <= 1, "{} held by {:?}", token, holders);
            }
        }
    }
}

#[test]
fn test_status_follows_last_zone() {
    let (mut board, zones, tokens) = reconciler_board();
    let token = &tokens[0];

    drop_token(&mut board, token, zones[0]);
    assert_eq!(board.token(token).unwrap().status(), ReconciliationStatus::New);

    drop_token(&mut board, token, zones[1]);
    assert_eq!(board.token(token).unwrap().status(), ReconciliationStatus::Unknown);
    assert!(!board.zone(zones[0]).unwrap().contains(token));

    drop_token(&mut board, token, zones[3]);
    assert_eq!(board.token(token).unwrap().status(), ReconciliationStatus::Linked);
    assert_eq!(board.zones_containing(token), vec![zones[3]]);
}

#[test]
fn test_pool_synchronization_after_text_change() {
    let (mut board, zones, tokens) = reconciler_board();
    let token = &tokens[1];
    drop_token(&mut board, token, zones[2]);

    let long = "x".repeat(100);
    board.set_token_text(token, long.clone()).unwrap();

    let t = board.token(token).unwrap();
    assert_eq!(t.full_text(), long);
    let containers: Vec<Container> = t.containers().collect();
    assert_eq!(
        containers,
        vec![Container::Pool(TokenKind::Tagged), Container::Zone(zones[2])]
    );
    for container in containers {
        assert_eq!(t.view(container).unwrap().text, "x".repeat(75));
        assert_eq!(t.view(container).unwrap().status_class, "entity-token-linked");
    }
}

#[test]
fn test_tagged_token_survives_delete_zone() {
    let (mut board, zones, tokens) = reconciler_board();
    let trash = board.add_zone(DropZone::delete("delete"));
    let token = &tokens[0];
    drop_token(&mut board, token, zones[0]);

    assert!(matches!(
        drop_token(&mut board, token, trash),
        DropOutcome::Rejected { .. }
    ));
    assert!(board.token(token).is_some());
    assert!(board.zone(zones[0]).unwrap().contains(token));
}

#[test]
fn test_drag_of_missing_token_fails() {
    let (board, _, _) = reconciler_board();
    assert!(board.begin_drag(&TokenId::untagged("99")).is_err());
}
