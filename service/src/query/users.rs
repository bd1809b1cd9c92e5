//! [`Query`] collection related to the multiple [`User`]s.

use common::operations::By;

use crate::domain::User;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`User`]s.
pub type List = DatabaseQuery<By<Vec<User>, ()>>;

#[cfg(test)]
mod spec {
    use crate::{
        domain::user,
        infra::Memory,
        query::{self, Query as _},
        seed, Service,
    };

    fn service() -> Service<Memory> {
        Service::new(Memory::new(Vec::new(), seed::users()).unwrap())
    }

    #[tokio::test]
    async fn lists_all_users() {
        let users = service().execute(query::users::List::by(())).await.unwrap();

        assert_eq!(
            users
                .iter()
                .map(|u| (usize::from(u.id), u.name.to_string(), u.age))
                .collect::<Vec<_>>(),
            [
                (0, "Alice".to_owned(), 25),
                (1, "Bob".to_owned(), 30),
                (2, "Charlie".to_owned(), 22),
            ],
        );
    }

    #[tokio::test]
    async fn finds_user_by_index() {
        let svc = service();

        let bob = svc
            .execute(query::user::ById::by(user::Id::from(1)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bob.name, user::Name::from("Bob"));

        let missing = svc
            .execute(query::user::ById::by(user::Id::from(3)))
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
