//! [`Coupon`]-related [`Database`] implementations.

use common::operations::{By, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{coupon, Coupon},
    infra::{
        database::{
            self,
            memory::{client, NonTx, Tx},
            Memory,
        },
        Database,
    },
};

impl Database<Select<By<Option<Coupon>, coupon::Code>>> for Memory<NonTx> {
    type Ok = Option<Coupon>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Coupon>, coupon::Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        let coupons = self.coupons().await;
        Ok(client::find(&coupons, by.inner()).cloned())
    }
}

impl Database<Select<By<Option<Coupon>, coupon::Code>>> for Memory<Tx> {
    type Ok = Option<Coupon>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Coupon>, coupon::Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.find(by.inner()).await.map_err(tracerr::wrap!())
    }
}

impl Database<Select<By<Vec<Coupon>, ()>>> for Memory<NonTx> {
    type Ok = Vec<Coupon>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Coupon>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.coupons().await.clone())
    }
}

impl Database<Update<Coupon>> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(coupon): Update<Coupon>,
    ) -> Result<Self::Ok, Self::Err> {
        self.stage(coupon).await.map_err(tracerr::wrap!())
    }
}
