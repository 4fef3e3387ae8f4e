use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use scriptorium_auth::{Action, ArticleAction, Role, Subject, UserAction, authorize};
use scriptorium_core::SubjectId;

fn bench_article_decisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy/article");

    for role in Role::ALL {
        let subject = Subject::new(SubjectId::new(1), role);
        group.bench_with_input(BenchmarkId::new("update_foreign", role), &subject, |b, s| {
            b.iter(|| {
                authorize(
                    black_box(s),
                    Action::Article(ArticleAction::Update),
                    Some(SubjectId::new(2)),
                )
            })
        });
        group.bench_with_input(BenchmarkId::new("delete_own", role), &subject, |b, s| {
            b.iter(|| {
                authorize(
                    black_box(s),
                    Action::Article(ArticleAction::Delete),
                    Some(SubjectId::new(1)),
                )
            })
        });
    }

    group.finish();
}

fn bench_user_decisions(c: &mut Criterion) {
    let user = Subject::new(SubjectId::new(1), Role::User);
    let admin = Subject::new(SubjectId::new(2), Role::Admin);

    c.bench_function("policy/user/list_denied", |b| {
        b.iter(|| authorize(black_box(&user), Action::User(UserAction::List), None))
    });
    c.bench_function("policy/user/list_admin", |b| {
        b.iter(|| authorize(black_box(&admin), Action::User(UserAction::List), None))
    });
}

criterion_group!(benches, bench_article_decisions, bench_user_decisions);
criterion_main!(benches);
