// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cushion::http::session_cookie_value;
use cushion::{GetDocument, Operation, PutAttachment};
use url::Url;

fn request_building_benchmark(c: &mut Criterion) {
    let base = Url::parse("http://localhost:5984").unwrap();
    let get = Operation::from(GetDocument::new().database("animals").doc_id("aardvark/1"));
    let put = Operation::from(
        PutAttachment::new()
            .database("animals")
            .doc_id("aardvark")
            .rev("1-967a00dff5e02add41819138abb3284d")
            .name("photo.jpg")
            .content_type("image/jpeg")
            .data(vec![0u8; 4096]),
    );

    c.bench_function("build_get_document", |b| {
        b.iter(|| black_box(get.to_request(&base).unwrap()))
    });

    c.bench_function("build_put_attachment", |b| {
        b.iter(|| black_box(put.to_request(&base).unwrap()))
    });
}

fn cookie_parsing_benchmark(c: &mut Criterion) {
    let header = "AuthSession=YWRtaW46NUJBNjNBMTc6Hl7z1Y7o9; Version=1; Expires=Tue, 05 Mar 2030 14:06:11 GMT; Max-Age=600; Path=/; HttpOnly";

    c.bench_function("session_cookie_value", |b| {
        b.iter(|| black_box(session_cookie_value(black_box(header))))
    });
}

criterion_group!(benches, request_building_benchmark, cookie_parsing_benchmark);
criterion_main!(benches);
