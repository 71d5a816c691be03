//! In-memory product store for testing
//!
//! Mirrors the table's behavior: ids are generated in ascending order and a
//! missing `isim` is rejected like the NOT NULL constraint. Reads and writes
//! can each be made to fail to simulate an unavailable database.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::repos::DbError;
use super::store::ProductStore;
use crate::models::{NewProduct, Product, ProductUpdate};

#[derive(Default)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, Product>,
}

/// Product store held in a mutex-guarded map
#[derive(Default)]
pub struct MemoryStore {
    table: Mutex<Table>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent list/get/ping fail with a driver error
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent create/update/delete fail with a driver error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.table.lock().unwrap().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_readable(&self) -> Result<(), DbError> {
        check(&self.fail_reads, "simulated read failure")
    }

    fn check_writable(&self) -> Result<(), DbError> {
        check(&self.fail_writes, "simulated write failure")
    }
}

fn check(flag: &AtomicBool, message: &str) -> Result<(), DbError> {
    if flag.load(Ordering::SeqCst) {
        return Err(DbError::Sqlx(sqlx::Error::Protocol(message.into())));
    }
    Ok(())
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Product>, DbError> {
        self.check_readable()?;
        Ok(self.table.lock().unwrap().rows.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Product, DbError> {
        self.check_readable()?;
        self.table
            .lock()
            .unwrap()
            .rows
            .get(&id)
            .cloned()
            .ok_or(DbError::NotFound { id })
    }

    async fn create(&self, product: NewProduct) -> Result<i32, DbError> {
        self.check_writable()?;
        let isim = product.isim.ok_or_else(|| {
            DbError::Sqlx(sqlx::Error::Protocol(
                "null value in column \"isim\" violates not-null constraint".into(),
            ))
        })?;

        let mut table = self.table.lock().unwrap();
        table.next_id += 1;
        let id = table.next_id;
        table.rows.insert(
            id,
            Product {
                id,
                isim,
                aciklama: product.aciklama,
                fiyat: product.fiyat,
                miktar: product.miktar,
                gorsel: product.gorsel,
            },
        );
        Ok(id)
    }

    async fn update(&self, id: i32, update: ProductUpdate) -> Result<(), DbError> {
        self.check_writable()?;
        let mut table = self.table.lock().unwrap();
        let row = table.rows.get_mut(&id).ok_or(DbError::NotFound { id })?;
        *row = Product {
            id,
            isim: update.isim,
            aciklama: update.aciklama,
            fiyat: update.fiyat,
            miktar: update.miktar,
            gorsel: update.gorsel,
        };
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        self.check_writable()?;
        self.table
            .lock()
            .unwrap()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(DbError::NotFound { id })
    }

    async fn ping(&self) -> Result<(), DbError> {
        self.check_readable()
    }
}
