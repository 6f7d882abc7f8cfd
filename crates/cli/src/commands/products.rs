use serde::Serialize;
use serde_json::Value;
use vitrina_core::domain::product::{NewProduct, ProductId, ProductPatch};
use vitrina_store::CatalogRepository;

use crate::commands::{with_catalog, CommandResult};

pub fn list(limit: Option<usize>) -> CommandResult {
    let result = with_catalog("list", |catalog| async move { catalog.list().await });

    match result {
        Ok(mut products) => {
            if let Some(limit) = limit {
                products.truncate(limit);
            }
            CommandResult::success_with_data(
                "list",
                format!("{} products", products.len()),
                to_data(&products),
            )
        }
        Err(failure) => failure,
    }
}

pub fn get(id: u64) -> CommandResult {
    let result =
        with_catalog("get", |catalog| async move { catalog.get_by_id(ProductId(id)).await });

    match result {
        Ok(Some(product)) => {
            CommandResult::success_with_data("get", format!("product {id}"), to_data(&product))
        }
        Ok(None) => CommandResult::failure("get", "not_found", format!("product {id} does not exist"), 6),
        Err(failure) => failure,
    }
}

pub fn add(fields: NewProduct) -> CommandResult {
    let result = with_catalog("add", |catalog| async move { catalog.create(fields).await });

    match result {
        Ok(products) => match products.last() {
            Some(created) => CommandResult::success_with_data(
                "add",
                format!("product {} created", created.id),
                to_data(created),
            ),
            None => CommandResult::failure("add", "invariant", "catalog is empty after create", 5),
        },
        Err(failure) => failure,
    }
}

pub fn update(id: u64, patch: ProductPatch) -> CommandResult {
    if patch.is_empty() {
        return CommandResult::failure(
            "update",
            "validation",
            "nothing to update: pass at least one field",
            5,
        );
    }

    let result =
        with_catalog("update", |catalog| async move { catalog.update(ProductId(id), patch).await });

    match result {
        Ok(updated) => CommandResult::success_with_data(
            "update",
            format!("product {id} updated"),
            to_data(&updated),
        ),
        Err(failure) => failure,
    }
}

pub fn delete(id: u64) -> CommandResult {
    let result =
        with_catalog("delete", |catalog| async move { catalog.delete(ProductId(id)).await });

    match result {
        Ok(()) => CommandResult::success("delete", format!("product {id} deleted")),
        Err(failure) => failure,
    }
}

fn to_data<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}
