//! Generic entity repository over MongoDB.
//!
//! [`MongoRepository`] implements the full data-access contract for any
//! [`Entity`]: CRUD with soft deletion, filtered counts, grouped counts,
//! and a pagination engine that runs search, relation resolution, sorting,
//! and the count+slice in a single aggregation pipeline. Typed
//! repositories supply a [`CollectionSpec`] describing the collection's
//! searchable fields, sortable fields, and default relations.

use bson::oid::ObjectId;
use bson::{Bson, DateTime, Document, doc};
use futures::TryStreamExt;
use mongodb::ClientSession;
use mongodb::options::ReturnDocument;
use serde::de::DeserializeOwned;

use scribe_core::error::{AppError, ErrorKind};
use scribe_core::result::AppResult;
use scribe_core::traits::Entity;
use scribe_core::types::{Join, PageQuery, Paginated, Predicate, Relation};

use crate::filter::{FilterSpec, lower, search_stage};

/// Static description of a collection's query surface.
#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    /// Fields free-text search applies to.
    pub searchable_fields: &'static [&'static str],
    /// Fields callers may sort by.
    pub sortable_fields: &'static [&'static str],
    /// Sort field used when the requested one is absent or not allowed.
    pub default_sort_field: &'static str,
    /// Relations resolved by [`Relation::Default`].
    pub default_joins: &'static [Join],
}

/// One bucket of a grouped count.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GroupCount {
    /// The grouped field value (`un-categorized` for missing/null).
    pub key: String,
    /// Number of matching documents with this value.
    pub count: u64,
}

/// Result of a count query, grouped or total.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum CountSummary {
    /// A single total count (no group field given).
    Total { total_count: u64 },
    /// Per-value counts, sorted by count descending.
    Grouped(Vec<GroupCount>),
}

/// Generic repository over a single entity collection.
#[derive(Debug, Clone)]
pub struct MongoRepository<E: Entity> {
    collection: mongodb::Collection<E>,
    spec: CollectionSpec,
}

impl<E: Entity> MongoRepository<E> {
    /// Create a repository bound to the entity's collection.
    pub fn new(database: &mongodb::Database, spec: CollectionSpec) -> Self {
        Self {
            collection: database.collection(E::COLLECTION),
            spec,
        }
    }

    /// The collection's query-surface description.
    pub fn spec(&self) -> &CollectionSpec {
        &self.spec
    }

    fn doc_collection(&self) -> mongodb::Collection<Document> {
        self.collection.clone_with_type()
    }

    // -- Create --

    /// Insert a new entity.
    pub async fn create(
        &self,
        entity: E,
        session: Option<&mut ClientSession>,
    ) -> AppResult<E> {
        let action = self.collection.insert_one(&entity);
        let result = match session {
            Some(s) => action.session(s).await,
            None => action.await,
        };
        result.map_err(|e| db_err("insert", e))?;
        Ok(entity)
    }

    /// Insert a batch of entities as an ordered write: insertion stops at
    /// the first failure, leaving earlier documents in place.
    pub async fn create_many(
        &self,
        entities: Vec<E>,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Vec<E>> {
        if entities.is_empty() {
            return Ok(entities);
        }
        let action = self.collection.insert_many(&entities).ordered(true);
        let result = match session {
            Some(s) => action.session(s).await,
            None => action.await,
        };
        result.map_err(|e| db_err("insert_many", e))?;
        Ok(entities)
    }

    // -- Read --

    /// Find a single entity. Absence is `Ok(None)`.
    pub async fn find_one(
        &self,
        filter: FilterSpec,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<E>> {
        let action = self.collection.find_one(filter.compose());
        let result = match session {
            Some(s) => action.session(s).await,
            None => action.await,
        };
        result.map_err(|e| db_err("find_one", e))
    }

    /// Find a single entity by id, excluding soft-deleted documents.
    pub async fn find_one_by_id(
        &self,
        id: ObjectId,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<E>> {
        self.find_one(FilterSpec::with_base(Predicate::eq("_id", id)), session)
            .await
    }

    /// Simple (non-paginated) listing: composed filter, optional sort,
    /// flat result.
    pub async fn find(
        &self,
        filter: FilterSpec,
        sort: Option<Document>,
    ) -> AppResult<Vec<E>> {
        let mut action = self.collection.find(filter.compose());
        if let Some(sort) = sort {
            action = action.sort(sort);
        }
        let cursor = action.await.map_err(|e| db_err("find", e))?;
        cursor.try_collect().await.map_err(|e| db_err("find", e))
    }

    /// Simple listing with relation resolution, deserialized into a view
    /// type carrying the embedded relation fields.
    pub async fn find_with<T: DeserializeOwned>(
        &self,
        filter: FilterSpec,
        sort: Option<Document>,
        relation: Relation,
    ) -> AppResult<Vec<T>> {
        let mut pipeline = vec![doc! { "$match": filter.compose() }];
        for join in self.resolve_joins(&relation) {
            pipeline.extend(join_stages(join));
        }
        if let Some(sort) = sort {
            pipeline.push(doc! { "$sort": sort });
        }
        let cursor = self
            .doc_collection()
            .aggregate(pipeline)
            .await
            .map_err(|e| db_err("aggregate", e))?;
        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| db_err("aggregate", e))?;
        docs.into_iter()
            .map(|d| bson::from_document(d).map_err(AppError::from))
            .collect()
    }

    /// Paginated listing through a single aggregation pipeline.
    ///
    /// The pipeline matches the composed filter, applies free-text search
    /// over the declared searchable fields, resolves relations, then takes
    /// the sorted slice and the total count from the same snapshot via
    /// `$facet`.
    pub async fn paginate<T: DeserializeOwned>(
        &self,
        query: &PageQuery,
        filter: FilterSpec,
        relation: Relation,
    ) -> AppResult<Paginated<T>> {
        let pipeline = build_page_pipeline(&self.spec, query, &filter, &relation);
        let cursor = self
            .doc_collection()
            .aggregate(pipeline)
            .await
            .map_err(|e| db_err("paginate", e))?;
        let mut facets: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| db_err("paginate", e))?;

        let facet = match facets.pop() {
            Some(facet) => facet,
            None => return Ok(Paginated::empty(query)),
        };

        let total = facet
            .get_array("total")
            .ok()
            .and_then(|arr| arr.first())
            .and_then(|b| b.as_document())
            .and_then(|d| d.get("count"))
            .and_then(count_as_u64)
            .unwrap_or(0);

        let data = match facet.get_array("data") {
            Ok(docs) => docs
                .iter()
                .filter_map(|b| b.as_document().cloned())
                .map(|d| bson::from_document(d).map_err(AppError::from))
                .collect::<AppResult<Vec<T>>>()?,
            Err(_) => Vec::new(),
        };

        Ok(Paginated::new(data, query, total))
    }

    fn resolve_joins<'a>(&self, relation: &'a Relation) -> &'a [Join]
    where
        'static: 'a,
    {
        match relation {
            Relation::None => &[],
            Relation::Default => self.spec.default_joins,
            Relation::Explicit(joins) => joins.as_slice(),
        }
    }

    // -- Update --

    /// Update the first document matching the filter and return the new
    /// version. Soft-deleted documents are never updated. `updatedAt` is
    /// always re-stamped.
    pub async fn update_one(
        &self,
        filter: Predicate,
        patch: Document,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<E>> {
        let mut filter = lower(&filter);
        filter.insert("deleted", false);
        let action = self
            .collection
            .find_one_and_update(filter, stamp_update(patch))
            .return_document(ReturnDocument::After);
        let result = match session {
            Some(s) => action.session(s).await,
            None => action.await,
        };
        result.map_err(|e| db_err("update_one", e))
    }

    /// Update a document by id. See [`MongoRepository::update_one`].
    pub async fn update_one_by_id(
        &self,
        id: ObjectId,
        patch: Document,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<E>> {
        self.update_one(Predicate::eq("_id", id), patch, session)
            .await
    }

    /// Update every matching document, returning the modified count.
    /// Soft-deleted documents are never updated.
    pub async fn update_many(
        &self,
        filter: Predicate,
        patch: Document,
        session: Option<&mut ClientSession>,
    ) -> AppResult<u64> {
        let mut filter = lower(&filter);
        filter.insert("deleted", false);
        let coll = self.doc_collection();
        let action = coll.update_many(filter, stamp_update(patch));
        let result = match session {
            Some(s) => action.session(s).await,
            None => action.await,
        };
        result
            .map(|r| r.modified_count)
            .map_err(|e| db_err("update_many", e))
    }

    // -- Soft delete --

    /// Mark the first matching document as deleted and return it. Already
    /// soft-deleted documents are excluded, so repeating the call yields
    /// `Ok(None)`. `updatedAt` is re-stamped along with the deletion
    /// markers, so it moves on soft deletion.
    pub async fn soft_delete(
        &self,
        filter: Predicate,
        deleted_by: Option<ObjectId>,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<E>> {
        let mut filter = lower(&filter);
        filter.insert("deleted", false);
        let now = DateTime::now();
        let mut set = doc! { "deleted": true, "deletedAt": now, "updatedAt": now };
        if let Some(by) = deleted_by {
            set.insert("deletedBy", by);
        }
        let action = self
            .collection
            .find_one_and_update(filter, doc! { "$set": set })
            .return_document(ReturnDocument::After);
        let result = match session {
            Some(s) => action.session(s).await,
            None => action.await,
        };
        result.map_err(|e| db_err("soft_delete", e))
    }

    /// Soft-delete a document by id.
    pub async fn soft_delete_by_id(
        &self,
        id: ObjectId,
        deleted_by: Option<ObjectId>,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<E>> {
        self.soft_delete(Predicate::eq("_id", id), deleted_by, session)
            .await
    }

    // -- Physical delete --

    /// Physically remove the first matching document. The filter is taken
    /// literally; soft-deleted documents are eligible.
    pub async fn delete(
        &self,
        filter: Predicate,
        session: Option<&mut ClientSession>,
    ) -> AppResult<bool> {
        let coll = self.doc_collection();
        let action = coll.delete_one(lower(&filter));
        let result = match session {
            Some(s) => action.session(s).await,
            None => action.await,
        };
        result
            .map(|r| r.deleted_count > 0)
            .map_err(|e| db_err("delete", e))
    }

    /// Physically remove a document by id.
    pub async fn delete_one_by_id(
        &self,
        id: ObjectId,
        session: Option<&mut ClientSession>,
    ) -> AppResult<bool> {
        self.delete(Predicate::eq("_id", id), session).await
    }

    /// Physically remove every matching document, returning the count.
    pub async fn delete_many(
        &self,
        filter: Predicate,
        session: Option<&mut ClientSession>,
    ) -> AppResult<u64> {
        let coll = self.doc_collection();
        let action = coll.delete_many(lower(&filter));
        let result = match session {
            Some(s) => action.session(s).await,
            None => action.await,
        };
        result
            .map(|r| r.deleted_count)
            .map_err(|e| db_err("delete_many", e))
    }

    // -- Counts --

    /// Count documents matching the composed filter.
    pub async fn count(&self, filter: FilterSpec) -> AppResult<u64> {
        self.doc_collection()
            .count_documents(filter.compose())
            .await
            .map_err(|e| db_err("count", e))
    }

    /// Check whether at least one document matches the composed filter.
    pub async fn exists(&self, filter: FilterSpec) -> AppResult<bool> {
        Ok(self.count(filter).await? > 0)
    }

    /// Count matching documents, optionally grouped by a field.
    ///
    /// With a group field, returns per-value buckets sorted by count
    /// descending; documents missing the field fall into the
    /// `un-categorized` bucket.
    pub async fn grouped_counts(
        &self,
        group_field: Option<&str>,
        filter: FilterSpec,
    ) -> AppResult<CountSummary> {
        let Some(field) = group_field else {
            let total = self.count(filter).await?;
            return Ok(CountSummary::Total { total_count: total });
        };

        let pipeline = vec![
            doc! { "$match": filter.compose() },
            doc! { "$group": { "_id": format!("${field}"), "count": { "$sum": 1 } } },
            doc! { "$sort": { "count": -1 } },
        ];
        let cursor = self
            .doc_collection()
            .aggregate(pipeline)
            .await
            .map_err(|e| db_err("grouped_counts", e))?;
        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| db_err("grouped_counts", e))?;

        let groups = docs
            .into_iter()
            .map(|d| {
                let key = match d.get("_id") {
                    None | Some(Bson::Null) => "un-categorized".to_string(),
                    Some(Bson::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                };
                let count = d.get("count").and_then(count_as_u64).unwrap_or(0);
                GroupCount { key, count }
            })
            .collect();
        Ok(CountSummary::Grouped(groups))
    }
}

/// Assemble the aggregation pipeline for [`MongoRepository::paginate`]:
/// composed `$match`, free-text search `$match`, relation stages, then a
/// `$facet` taking the sorted page slice and the total count from the same
/// snapshot.
fn build_page_pipeline(
    spec: &CollectionSpec,
    query: &PageQuery,
    filter: &FilterSpec,
    relation: &Relation,
) -> Vec<Document> {
    let mut pipeline = vec![doc! { "$match": filter.compose() }];

    if let Some(term) = query.search_key.as_deref() {
        if let Some(stage) = search_stage(term, spec.searchable_fields) {
            pipeline.push(doc! { "$match": stage });
        }
    }

    let joins: &[Join] = match relation {
        Relation::None => &[],
        Relation::Default => spec.default_joins,
        Relation::Explicit(joins) => joins.as_slice(),
    };
    for join in joins {
        pipeline.extend(join_stages(join));
    }

    let sort_field = query
        .sort_by
        .as_deref()
        .filter(|f| spec.sortable_fields.iter().any(|s| s == f))
        .unwrap_or(spec.default_sort_field);

    pipeline.push(doc! {
        "$facet": {
            "data": [
                { "$sort": { sort_field: query.sort_order.as_int() } },
                { "$skip": query.skip() as i64 },
                { "$limit": query.limit as i64 },
            ],
            "total": [
                { "$count": "count" },
            ],
        }
    });
    pipeline
}

/// Expand a join descriptor into its pipeline stages: `$lookup`, a
/// null-preserving `$unwind`, and (when a projection is declared) an
/// `$addFields` rewrite that narrows the embedded document or substitutes
/// an explicit null when the reference did not resolve.
fn join_stages(join: &Join) -> Vec<Document> {
    let path = format!("${}", join.as_field);
    let mut stages = vec![
        doc! { "$lookup": {
            "from": join.from,
            "localField": join.local_field,
            "foreignField": join.foreign_field,
            "as": join.as_field,
        }},
        doc! { "$unwind": {
            "path": path.clone(),
            "preserveNullAndEmptyArrays": true,
        }},
    ];
    if let Some(select) = join.select {
        let mut projected = Document::new();
        for field in select {
            projected.insert(*field, format!("{path}.{field}"));
        }
        stages.push(doc! { "$addFields": {
            join.as_field: {
                "$cond": [ { "$ne": [ path, null ] }, projected, null ]
            }
        }});
    }
    stages
}

/// Normalize an update patch: `$`-operator entries pass through, plain
/// fields are wrapped in `$set`, and `updatedAt` is merged into `$set`
/// either way.
fn stamp_update(patch: Document) -> Document {
    let mut update = Document::new();
    let mut set = Document::new();
    for (key, value) in patch {
        if key == "$set" {
            if let Bson::Document(fields) = value {
                set.extend(fields);
            }
        } else if key.starts_with('$') {
            update.insert(key, value);
        } else {
            set.insert(key, value);
        }
    }
    set.insert("updatedAt", DateTime::now());
    update.insert("$set", set);
    update
}

/// Read an aggregation count, which the server may return as any integer
/// width.
fn count_as_u64(value: &Bson) -> Option<u64> {
    match value {
        Bson::Int32(v) => u64::try_from(*v).ok(),
        Bson::Int64(v) => u64::try_from(*v).ok(),
        Bson::Double(v) if *v >= 0.0 => Some(*v as u64),
        _ => None,
    }
}

/// Map a driver error, recognizing duplicate-key violations as conflicts.
/// The driver message passes through untouched.
fn db_err(op: &str, err: mongodb::error::Error) -> AppError {
    let kind = if is_duplicate_key(&err) {
        ErrorKind::Conflict
    } else {
        ErrorKind::Database
    };
    AppError::with_source(kind, format!("{op} failed: {err}"), err)
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind as DriverKind, WriteFailure};
    match err.kind.as_ref() {
        DriverKind::Write(WriteFailure::WriteError(we)) => we.code == 11000,
        _ => err.to_string().contains("E11000"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::types::SortOrder;

    const SPEC: CollectionSpec = CollectionSpec {
        searchable_fields: &["content", "slug", "tags"],
        sortable_fields: &["publishedAt", "createdAt", "viewCount"],
        default_sort_field: "createdAt",
        default_joins: &[Join {
            from: "users",
            local_field: "author",
            foreign_field: "_id",
            as_field: "author",
            select: Some(&["_id", "firstName", "lastName", "email", "avatar"]),
        }],
    };

    fn pipeline_for(query: &PageQuery, filter: FilterSpec, relation: Relation) -> Vec<Document> {
        build_page_pipeline(&SPEC, query, &filter, &relation)
    }

    #[test]
    fn stamp_update_wraps_plain_fields_in_set() {
        let update = stamp_update(doc! { "title": "New" });
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("title").unwrap(), "New");
        assert!(set.contains_key("updatedAt"));
    }

    #[test]
    fn stamp_update_passes_operators_through() {
        let update = stamp_update(doc! { "$inc": { "viewCount": 1 }, "$unset": { "featuredImage": "" } });
        assert!(update.contains_key("$inc"));
        assert!(update.contains_key("$unset"));
        let set = update.get_document("$set").unwrap();
        assert!(set.contains_key("updatedAt"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn stamp_update_merges_explicit_set() {
        let update = stamp_update(doc! { "$set": { "status": "PUBLISHED" }, "slug": "new" });
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("status").unwrap(), "PUBLISHED");
        assert_eq!(set.get_str("slug").unwrap(), "new");
        assert!(set.contains_key("updatedAt"));
    }

    #[test]
    fn join_stages_emit_lookup_unwind_addfields() {
        let stages = join_stages(&SPEC.default_joins[0]);
        assert_eq!(stages.len(), 3);
        let lookup = stages[0].get_document("$lookup").unwrap();
        assert_eq!(lookup.get_str("from").unwrap(), "users");
        let unwind = stages[1].get_document("$unwind").unwrap();
        assert_eq!(unwind.get_str("path").unwrap(), "$author");
        assert!(unwind.get_bool("preserveNullAndEmptyArrays").unwrap());
        let add = stages[2].get_document("$addFields").unwrap();
        let cond = add.get_document("author").unwrap().get_array("$cond").unwrap();
        assert_eq!(cond.len(), 3);
        assert_eq!(cond[2], Bson::Null);
    }

    #[test]
    fn join_without_select_skips_projection_rewrite() {
        let join = Join {
            from: "users",
            local_field: "author",
            foreign_field: "_id",
            as_field: "author",
            select: None,
        };
        assert_eq!(join_stages(&join).len(), 2);
    }

    #[test]
    fn pipeline_shape_with_search_and_default_joins() {
        let query = PageQuery {
            page: 2,
            limit: 10,
            search_key: Some("rust".into()),
            sort_by: Some("viewCount".into()),
            sort_order: SortOrder::Asc,
        };
        let pipeline = pipeline_for(&query, FilterSpec::active(), Relation::Default);

        // match, search match, lookup, unwind, addfields, facet
        assert_eq!(pipeline.len(), 6);
        assert!(pipeline[0].get_document("$match").unwrap().contains_key("deleted"));
        assert!(pipeline[1].get_document("$match").unwrap().contains_key("$or"));

        let facet = pipeline[5].get_document("$facet").unwrap();
        let data = facet.get_array("data").unwrap();
        let sort = data[0].as_document().unwrap().get_document("$sort").unwrap();
        assert_eq!(sort.get_i32("viewCount").unwrap(), 1);
        assert_eq!(
            data[1].as_document().unwrap().get_i64("$skip").unwrap(),
            10
        );
        assert_eq!(
            data[2].as_document().unwrap().get_i64("$limit").unwrap(),
            10
        );
    }

    #[test]
    fn pipeline_falls_back_to_default_sort() {
        let query = PageQuery {
            sort_by: Some("passwordHash".into()),
            ..PageQuery::default()
        };
        let pipeline = pipeline_for(&query, FilterSpec::active(), Relation::None);
        let facet = pipeline.last().unwrap().get_document("$facet").unwrap();
        let data = facet.get_array("data").unwrap();
        let sort = data[0].as_document().unwrap().get_document("$sort").unwrap();
        assert_eq!(sort.get_i32("createdAt").unwrap(), -1);
    }

    #[test]
    fn count_as_u64_accepts_integer_widths() {
        assert_eq!(count_as_u64(&Bson::Int32(7)), Some(7));
        assert_eq!(count_as_u64(&Bson::Int64(7)), Some(7));
        assert_eq!(count_as_u64(&Bson::String("7".into())), None);
    }
}
