//! SQLite-backed gallery catalog implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Transaction};

use super::{
    CatalogEntry, CatalogError, CatalogSearchQuery, CatalogStats, CatalogStore, FacetKind,
    FacetLinkFailure, FacetListing, FacetSet, GalleryRoute, NewGallery, PageRecord, PageRoute,
    SearchRow, SearchRows, StoredGallery,
};
use crate::slug::normalize_slug;

/// SQLite-backed gallery catalog.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Create a new SQLite catalog, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- One row per ingested gallery
            CREATE TABLE IF NOT EXISTS galleries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                external_id INTEGER NOT NULL UNIQUE,
                title TEXT NOT NULL,
                feature_image_url TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_galleries_created ON galleries(created_at);

            -- Route slug, one per gallery
            CREATE TABLE IF NOT EXISTS gallery_slugs (
                gallery_id INTEGER PRIMARY KEY REFERENCES galleries(id) ON DELETE CASCADE,
                slug TEXT NOT NULL UNIQUE
            );

            -- Reading pages
            CREATE TABLE IF NOT EXISTS gallery_pages (
                gallery_id INTEGER NOT NULL REFERENCES galleries(id) ON DELETE CASCADE,
                page_number INTEGER NOT NULL,
                image_url TEXT NOT NULL,
                PRIMARY KEY (gallery_id, page_number)
            );
            "#,
        )?;

        // Facet tables and their link tables share one layout per kind
        for kind in FacetKind::ALL {
            let facet = kind.facet_table();
            let link = kind.link_table();
            conn.execute_batch(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {facet} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL UNIQUE,
                    slug TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS {link} (
                    gallery_id INTEGER NOT NULL REFERENCES galleries(id) ON DELETE CASCADE,
                    facet_id INTEGER NOT NULL REFERENCES {facet}(id),
                    PRIMARY KEY (gallery_id, facet_id)
                );

                CREATE INDEX IF NOT EXISTS idx_{link}_facet ON {link}(facet_id);
                "#
            ))?;
        }

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::Internal("catalog connection lock poisoned".to_string()))
    }

    fn find_id_with(conn: &Connection, external_id: u64) -> Result<Option<i64>, CatalogError> {
        let id = conn
            .query_row(
                "SELECT id FROM galleries WHERE external_id = ?",
                params![external_id as i64],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Return the id of the facet named exactly `name`, inserting it if needed.
    fn get_or_create_facet(
        conn: &Connection,
        kind: FacetKind,
        name: &str,
    ) -> Result<i64, CatalogError> {
        let table = kind.facet_table();

        let existing: Option<i64> = conn
            .query_row(
                &format!("SELECT id FROM {table} WHERE name = ?"),
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        let slug = normalize_slug(name);
        let slug = if slug.is_empty() { name } else { slug.as_str() };

        conn.execute(
            &format!("INSERT INTO {table} (name, slug) VALUES (?, ?)"),
            params![name, slug],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Link one facet name inside its own savepoint.
    fn link_facet(
        tx: &mut Transaction<'_>,
        gallery_id: i64,
        kind: FacetKind,
        name: &str,
    ) -> Result<(), CatalogError> {
        let sp = tx.savepoint()?;
        let facet_id = Self::get_or_create_facet(&sp, kind, name)?;
        sp.execute(
            &format!(
                "INSERT OR IGNORE INTO {} (gallery_id, facet_id) VALUES (?, ?)",
                kind.link_table()
            ),
            params![gallery_id, facet_id],
        )?;
        sp.commit()?;
        Ok(())
    }

    /// Load facet names linked to an entry, in link order.
    fn load_facets(conn: &Connection, gallery_id: i64) -> Result<FacetSet, CatalogError> {
        let mut facets = FacetSet::new();

        for kind in FacetKind::ALL {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT f.name FROM {link} l
                 JOIN {facet} f ON f.id = l.facet_id
                 WHERE l.gallery_id = ?
                 ORDER BY l.rowid",
                link = kind.link_table(),
                facet = kind.facet_table(),
            ))?;

            let names = stmt
                .query_map(params![gallery_id], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;

            if !names.is_empty() {
                facets.extend(kind, names);
            }
        }

        Ok(facets)
    }

    /// Load pages for an entry.
    fn load_pages(conn: &Connection, gallery_id: i64) -> Result<Vec<PageRecord>, CatalogError> {
        let mut stmt = conn.prepare(
            "SELECT page_number, image_url FROM gallery_pages
             WHERE gallery_id = ? ORDER BY page_number",
        )?;

        let pages = stmt
            .query_map(params![gallery_id], |row| {
                Ok(PageRecord {
                    page_number: row.get(0)?,
                    image_url: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pages)
    }

    /// WHERE clause matching `?1` against the title or any linked facet name.
    fn search_filter() -> String {
        let mut clauses = vec![r"g.title LIKE ?1 ESCAPE '\'".to_string()];
        for kind in FacetKind::ALL {
            clauses.push(format!(
                r"EXISTS (SELECT 1 FROM {link} l JOIN {facet} f ON f.id = l.facet_id
                   WHERE l.gallery_id = g.id AND f.name LIKE ?1 ESCAPE '\')",
                link = kind.link_table(),
                facet = kind.facet_table(),
            ));
        }
        clauses.join(" OR ")
    }

    fn count(conn: &Connection, sql: &str) -> Result<u64, CatalogError> {
        let count: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// Build a LIKE pattern matching `text` anywhere, with wildcards escaped.
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', r"\\")
        .replace('%', r"\%")
        .replace('_', r"\_");
    format!("%{}%", escaped)
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

impl CatalogStore for SqliteCatalog {
    fn find_id(&self, external_id: u64) -> Result<Option<i64>, CatalogError> {
        let conn = self.lock()?;
        Self::find_id_with(&conn, external_id)
    }

    fn insert_gallery(&self, gallery: &NewGallery) -> Result<StoredGallery, CatalogError> {
        let mut conn = self.lock()?;
        let mut tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();

        tx.execute(
            "INSERT INTO galleries (external_id, title, feature_image_url, created_at)
             VALUES (?, ?, ?, ?)",
            params![
                gallery.external_id as i64,
                &gallery.title,
                &gallery.feature_image_url,
                &now,
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                CatalogError::Duplicate(gallery.external_id)
            } else {
                CatalogError::from(e)
            }
        })?;

        let gallery_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO gallery_slugs (gallery_id, slug) VALUES (?, ?)",
            params![gallery_id, &gallery.slug],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                CatalogError::SlugConflict(gallery.slug.clone())
            } else {
                CatalogError::from(e)
            }
        })?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO gallery_pages (gallery_id, page_number, image_url) VALUES (?, ?, ?)",
            )?;
            for (index, image_url) in gallery.pages.iter().enumerate() {
                stmt.execute(params![gallery_id, (index + 1) as i64, image_url])?;
            }
        }

        let mut linked_facets = 0;
        let mut facet_failures = Vec::new();

        for kind in FacetKind::ALL {
            for name in gallery.facets.names(kind) {
                match Self::link_facet(&mut tx, gallery_id, kind, name) {
                    Ok(()) => linked_facets += 1,
                    Err(e) => facet_failures.push(FacetLinkFailure {
                        kind,
                        name: name.clone(),
                        reason: e.to_string(),
                    }),
                }
            }
        }

        tx.commit()?;

        Ok(StoredGallery {
            id: gallery_id,
            slug: gallery.slug.clone(),
            linked_facets,
            facet_failures,
        })
    }

    fn remove_gallery(&self, external_id: u64) -> Result<(), CatalogError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let gallery_id =
            Self::find_id_with(&tx, external_id)?.ok_or(CatalogError::NotFound(external_id))?;

        // Children first, parent last; any failure rolls the whole teardown back
        tx.execute(
            "DELETE FROM gallery_pages WHERE gallery_id = ?",
            params![gallery_id],
        )?;
        for kind in FacetKind::ALL {
            tx.execute(
                &format!("DELETE FROM {} WHERE gallery_id = ?", kind.link_table()),
                params![gallery_id],
            )?;
        }
        tx.execute(
            "DELETE FROM gallery_slugs WHERE gallery_id = ?",
            params![gallery_id],
        )?;
        tx.execute("DELETE FROM galleries WHERE id = ?", params![gallery_id])?;

        tx.commit()?;
        Ok(())
    }

    fn get(&self, external_id: u64) -> Result<CatalogEntry, CatalogError> {
        let conn = self.lock()?;

        let mut entry = conn
            .query_row(
                "SELECT g.id, g.external_id, g.title, g.feature_image_url, s.slug, g.created_at
                 FROM galleries g
                 LEFT JOIN gallery_slugs s ON s.gallery_id = g.id
                 WHERE g.external_id = ?",
                params![external_id as i64],
                |row| {
                    let external_id: i64 = row.get(1)?;
                    let created_at: String = row.get(5)?;
                    Ok(CatalogEntry {
                        id: row.get(0)?,
                        external_id: external_id as u64,
                        title: row.get(2)?,
                        feature_image_url: row.get(3)?,
                        slug: row.get(4)?,
                        created_at: parse_timestamp(&created_at),
                        pages: Vec::new(),   // Loaded below
                        facets: FacetSet::new(), // Loaded below
                    })
                },
            )
            .optional()?
            .ok_or(CatalogError::NotFound(external_id))?;

        entry.pages = Self::load_pages(&conn, entry.id)?;
        entry.facets = Self::load_facets(&conn, entry.id)?;

        Ok(entry)
    }

    fn search(&self, query: &CatalogSearchQuery) -> Result<SearchRows, CatalogError> {
        let conn = self.lock()?;
        let pattern = like_pattern(&query.text);
        let filter = Self::search_filter();

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM galleries g WHERE {filter}"),
            params![&pattern],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            "SELECT g.id, g.title, g.feature_image_url, s.slug
             FROM galleries g
             LEFT JOIN gallery_slugs s ON s.gallery_id = g.id
             WHERE {filter}
             ORDER BY g.created_at DESC, g.id DESC
             LIMIT ?2 OFFSET ?3"
        ))?;

        let mut rows = stmt
            .query_map(
                params![&pattern, query.limit as i64, query.offset as i64],
                |row| {
                    Ok(SearchRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        feature_image_url: row.get(2)?,
                        slug: row.get(3)?,
                        facets: FacetSet::new(),
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        for row in &mut rows {
            row.facets = Self::load_facets(&conn, row.id)?;
        }

        Ok(SearchRows {
            rows,
            total: total as u64,
        })
    }

    fn list_facets(&self, kind: FacetKind, limit: u32) -> Result<Vec<FacetListing>, CatalogError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT f.name, f.slug, COUNT(l.gallery_id)
             FROM {facet} f
             LEFT JOIN {link} l ON l.facet_id = f.id
             WHERE f.slug IS NOT NULL AND f.slug <> ''
             GROUP BY f.id
             ORDER BY f.id
             LIMIT ?",
            facet = kind.facet_table(),
            link = kind.link_table(),
        ))?;

        let listings = stmt
            .query_map(params![limit as i64], |row| {
                let count: i64 = row.get(2)?;
                Ok(FacetListing {
                    name: row.get(0)?,
                    slug: row.get(1)?,
                    gallery_count: count as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(listings)
    }

    fn list_gallery_routes(&self, limit: u32) -> Result<Vec<GalleryRoute>, CatalogError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT s.slug, g.created_at
             FROM galleries g
             JOIN gallery_slugs s ON s.gallery_id = g.id
             ORDER BY g.created_at DESC, g.id DESC
             LIMIT ?",
        )?;

        let routes = stmt
            .query_map(params![limit as i64], |row| {
                let created_at: String = row.get(1)?;
                Ok(GalleryRoute {
                    slug: row.get(0)?,
                    created_at: parse_timestamp(&created_at),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(routes)
    }

    fn list_page_routes(&self, offset: u64, limit: u32) -> Result<Vec<PageRoute>, CatalogError> {
        // SQLite reads a negative OFFSET as 0; no table holds this many rows.
        let Ok(offset) = i64::try_from(offset) else {
            return Ok(Vec::new());
        };

        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT s.slug, p.page_number, g.created_at
             FROM gallery_pages p
             JOIN galleries g ON g.id = p.gallery_id
             JOIN gallery_slugs s ON s.gallery_id = g.id
             ORDER BY g.id, p.page_number
             LIMIT ? OFFSET ?",
        )?;

        let routes = stmt
            .query_map(params![limit as i64, offset], |row| {
                let created_at: String = row.get(2)?;
                Ok(PageRoute {
                    slug: row.get(0)?,
                    page_number: row.get(1)?,
                    created_at: parse_timestamp(&created_at),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(routes)
    }

    fn stats(&self) -> Result<CatalogStats, CatalogError> {
        let conn = self.lock()?;

        let total_entries = Self::count(&conn, "SELECT COUNT(*) FROM galleries")?;
        let total_pages = Self::count(&conn, "SELECT COUNT(*) FROM gallery_pages")?;

        let mut facets = std::collections::BTreeMap::new();
        let mut total_links = 0;
        for kind in FacetKind::ALL {
            let facet_count = Self::count(
                &conn,
                &format!("SELECT COUNT(*) FROM {}", kind.facet_table()),
            )?;
            facets.insert(kind, facet_count);
            total_links += Self::count(
                &conn,
                &format!("SELECT COUNT(*) FROM {}", kind.link_table()),
            )?;
        }

        let newest_entry = conn
            .query_row("SELECT MAX(created_at) FROM galleries", [], |row| {
                row.get::<_, Option<String>>(0)
            })?
            .map(|s| parse_timestamp(&s));

        Ok(CatalogStats {
            total_entries,
            total_pages,
            facets,
            total_links,
            newest_entry,
        })
    }
}
