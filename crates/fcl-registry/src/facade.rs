use fcl_store::KvStore;
use fcl_types::{
    Consumer, ConsumerAttributes, Farmer, FarmerAttributes, Product, ProductAttributes,
    Transaction, TransactionAttributes,
};

use crate::error::RegistryResult;
use crate::registry::Registry;

/// The four registries behind one handle.
///
/// `S` is cloned into each registry, so it should be a cheap shared handle
/// such as `Arc<impl KvStore>`, `Arc<dyn KvStore>`, or `&impl KvStore`.
/// Foreign-key fields (a product's farmer, a transaction's farmer and
/// consumer) are stored as given and never checked against the other
/// registries.
#[derive(Clone, Debug)]
pub struct FarmChain<S> {
    store: S,
}

impl<S: KvStore + Clone> FarmChain<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn farmers(&self) -> Registry<Farmer, S> {
        Registry::new(self.store.clone())
    }

    pub fn consumers(&self) -> Registry<Consumer, S> {
        Registry::new(self.store.clone())
    }

    pub fn products(&self) -> Registry<Product, S> {
        Registry::new(self.store.clone())
    }

    pub fn transactions(&self) -> Registry<Transaction, S> {
        Registry::new(self.store.clone())
    }

    // ---- Farmers ----

    pub fn register_farmer(&self, id: &str, name: &str, email: &str) -> RegistryResult<Farmer> {
        self.farmers().register(id, FarmerAttributes::new(name, email))
    }

    pub fn get_farmer(&self, id: &str) -> RegistryResult<Farmer> {
        self.farmers().get(id)
    }

    pub fn list_farmers(&self) -> RegistryResult<Vec<Farmer>> {
        self.farmers().list_all()
    }

    // ---- Consumers ----

    pub fn register_consumer(
        &self,
        id: &str,
        name: &str,
        location: &str,
    ) -> RegistryResult<Consumer> {
        self.consumers()
            .register(id, ConsumerAttributes::new(name, location))
    }

    pub fn get_consumer(&self, id: &str) -> RegistryResult<Consumer> {
        self.consumers().get(id)
    }

    pub fn list_consumers(&self) -> RegistryResult<Vec<Consumer>> {
        self.consumers().list_all()
    }

    // ---- Products ----

    pub fn register_product(
        &self,
        id: &str,
        farmer_id: &str,
        name: &str,
        price: &str,
    ) -> RegistryResult<Product> {
        self.products()
            .register(id, ProductAttributes::new(farmer_id, name, price))
    }

    pub fn get_product(&self, id: &str) -> RegistryResult<Product> {
        self.products().get(id)
    }

    pub fn list_products(&self) -> RegistryResult<Vec<Product>> {
        self.products().list_all()
    }

    // ---- Transactions ----

    pub fn record_transaction(
        &self,
        id: &str,
        farmer_id: &str,
        consumer_id: &str,
        amount: &str,
        timestamp: &str,
    ) -> RegistryResult<Transaction> {
        self.transactions().register(
            id,
            TransactionAttributes::new(farmer_id, consumer_id, amount, timestamp),
        )
    }

    pub fn get_transaction(&self, id: &str) -> RegistryResult<Transaction> {
        self.transactions().get(id)
    }

    pub fn list_transactions(&self) -> RegistryResult<Vec<Transaction>> {
        self.transactions().list_all()
    }
}
