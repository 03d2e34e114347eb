use sea_orm::DatabaseTransaction;
use skins_backend::adapters::memberships_sea::{self, MembershipCreate};
use skins_backend::db::txn::with_txn;
use skins_backend::entities::match_players::MembershipStatus;
use skins_backend::AppError;

use crate::support::build_test_state;
use crate::support::factory::{create_test_match, create_test_user};

async fn match_with_host(txn: &DatabaseTransaction) -> Result<(i64, i64), AppError> {
    let host = create_test_user(txn, "host").await?;
    let m = create_test_match(txn, host.id, 4, 0).await?;
    Ok((m.id, host.id))
}

#[tokio::test]
async fn count_joined_ignores_departed_players() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let (match_id, _) = match_with_host(txn).await?;
            assert_eq!(memberships_sea::count_joined(txn, match_id).await?, 1);

            let guest = create_test_user(txn, "guest").await?;
            let row = memberships_sea::create_membership(
                txn,
                MembershipCreate::joined(match_id, guest.id),
            )
            .await?;
            assert_eq!(row.status, MembershipStatus::Joined);
            assert!(!row.entry_fee_paid);
            assert_eq!(memberships_sea::count_joined(txn, match_id).await?, 2);

            memberships_sea::set_status(txn, row.id, MembershipStatus::Left).await?;
            assert_eq!(memberships_sea::count_joined(txn, match_id).await?, 1);

            let all = memberships_sea::find_all_by_match(txn, match_id).await?;
            assert_eq!(all.len(), 2, "left rows are kept");

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn rejoining_refreshes_joined_at() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let (match_id, _) = match_with_host(txn).await?;
            let guest = create_test_user(txn, "guest").await?;
            let row = memberships_sea::create_membership(
                txn,
                MembershipCreate::joined(match_id, guest.id),
            )
            .await?;

            let left = memberships_sea::set_status(txn, row.id, MembershipStatus::Left).await?;
            assert_eq!(left.joined_at, row.joined_at, "leaving keeps joined_at");
            assert!(left.updated_at >= row.updated_at);

            let back = memberships_sea::set_status(txn, row.id, MembershipStatus::Joined).await?;
            assert_eq!(back.id, row.id);
            assert!(back.joined_at >= row.joined_at);

            let found = memberships_sea::find_membership(txn, match_id, guest.id)
                .await?
                .expect("membership");
            assert_eq!(found.status, MembershipStatus::Joined);
            assert!(memberships_sea::find_membership(txn, match_id, guest.id + 10_000)
                .await?
                .is_none());

            Ok::<_, AppError>(())
        })
    })
    .await
}
