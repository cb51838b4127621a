use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use library_catalog::{BookId, LibraryCatalog, Role, UserId};

/// Catalog with `books` titles and one user per five books
fn stocked_catalog(books: u32) -> LibraryCatalog {
    let mut catalog = LibraryCatalog::new();
    for i in 0..books {
        catalog.add_book(format!("Title {i}"), format!("Author {}", i % 97), "isbn", "genre");
        if i % 5 == 0 {
            catalog.add_user(format!("User {i}"), "user@example.com", Role::Member);
        }
    }
    catalog
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_books_by_keyword");

    for books in [100_u32, 1_000, 10_000] {
        let catalog = stocked_catalog(books);
        group.bench_with_input(BenchmarkId::from_parameter(books), &catalog, |b, catalog| {
            b.iter(|| catalog.find_books_by_keyword(black_box("author 42")).len());
        });
    }

    group.finish();
}

fn bench_borrow_return(c: &mut Criterion) {
    let mut catalog = stocked_catalog(1_000);

    c.bench_function("borrow_then_return", |b| {
        b.iter(|| {
            let borrowed = catalog.borrow_book(black_box(UserId(1)), black_box(BookId(500)));
            let returned = catalog.return_book(UserId(1), BookId(500));
            (borrowed.is_ok(), returned.is_ok())
        });
    });
}

criterion_group!(benches, bench_search, bench_borrow_return);
criterion_main!(benches);
