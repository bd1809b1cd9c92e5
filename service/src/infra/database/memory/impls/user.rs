//! [`User`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{
        database::{self, memory::NonTx, Memory},
        Database,
    },
};

impl Database<Select<By<Vec<User>, ()>>> for Memory<NonTx> {
    type Ok = Vec<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<User>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.users().to_vec())
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Memory<NonTx> {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let index: usize = by.into_inner().into();
        Ok(self.users().get(index).cloned())
    }
}
