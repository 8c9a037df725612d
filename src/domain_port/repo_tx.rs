/// Opens the unit of work a whole service operation runs in.
#[async_trait::async_trait]
pub trait TxManager: Send + Sync {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>>;
}

#[async_trait::async_trait]
pub trait StorageTx<'t>: Send {
    /// Name of the storage backend that opened this transaction. Adapters
    /// check it before reaching for their concrete transaction type.
    fn backend(&self) -> &'static str;

    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;
}
