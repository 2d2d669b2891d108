#![allow(non_snake_case)]

use super::*;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;
use tokio::io::duplex;
use tokio::sync::mpsc;

// Disposable tests

#[test]
fn Disposable___dispose___runs_action_once() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let disposable = Disposable::create(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    disposable.dispose();

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn Disposable___drop___runs_action() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);

    {
        let _disposable = Disposable::create(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

// WriteData tests

#[test]
fn WriteData___ascii_text___passes_through() {
    let data = WriteData::Text("Content-Length: 2\r\n\r\n", Encoding::Ascii);

    assert_eq!(data.as_bytes().unwrap(), b"Content-Length: 2\r\n\r\n");
}

#[test]
fn WriteData___non_ascii_as_ascii___is_invalid_input() {
    let data = WriteData::Text("héllo", Encoding::Ascii);

    let err = data.as_bytes().unwrap_err();

    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
}

#[test]
fn WriteData___utf8_text___accepts_any_str() {
    let data = WriteData::Text("héllo", Encoding::Utf8);

    assert_eq!(data.as_bytes().unwrap(), "héllo".as_bytes());
}

// ReadableStreamWrapper tests

#[tokio::test]
async fn ReadableStreamWrapper___on_data___receives_written_bytes() {
    let (mut far, near) = duplex(1024);
    let readable = ReadableStreamWrapper::new(near);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let _sub = readable.on_data(Box::new(move |chunk: &[u8]| {
        let _ = tx.send(chunk.to_vec());
    }));
    far.write_all(b"hello").await.unwrap();

    let received = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(received, b"hello");
}

#[tokio::test]
async fn ReadableStreamWrapper___peer_closed___fires_end_then_close() {
    let (far, near) = duplex(1024);
    let readable = ReadableStreamWrapper::new(near);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let end_tx = tx.clone();
    let _end = readable.on_end(Box::new(move || {
        let _ = end_tx.send("end");
    }));
    let close_tx = tx.clone();
    let _close = readable.on_close(Box::new(move || {
        let _ = close_tx.send("close");
    }));
    let _data = readable.on_data(Box::new(|_: &[u8]| {}));
    drop(far);

    let first = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
    let second = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
    assert_eq!(first, Some("end"));
    assert_eq!(second, Some("close"));
}

#[tokio::test]
async fn ReadableStreamWrapper___disposed_listener___is_removed() {
    let (_far, near) = duplex(1024);
    let readable = ReadableStreamWrapper::new(near);

    let first = readable.on_data(Box::new(|_: &[u8]| {}));
    let _second = readable.on_data(Box::new(|_: &[u8]| {}));
    assert_eq!(readable.data_listener_count(), 2);

    first.dispose();

    assert_eq!(readable.data_listener_count(), 1);
}

#[test]
fn ReadableStreamWrapper___outside_runtime___reports_error_and_close() {
    let (_far, near) = duplex(16);
    let readable = ReadableStreamWrapper::new(near);
    let errors = Arc::new(AtomicUsize::new(0));
    let closes = Arc::new(AtomicUsize::new(0));

    let error_count = Arc::clone(&errors);
    let _err = readable.on_error(Box::new(move |_| {
        error_count.fetch_add(1, Ordering::SeqCst);
    }));
    let close_count = Arc::clone(&closes);
    let _close = readable.on_close(Box::new(move || {
        close_count.fetch_add(1, Ordering::SeqCst);
    }));
    let _data = readable.on_data(Box::new(|_: &[u8]| {}));

    assert_eq!(errors.load(Ordering::SeqCst), 1);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

// WritableStreamWrapper tests

#[tokio::test]
async fn WritableStreamWrapper___write___text_and_binary_reach_peer() {
    let (near, mut far) = duplex(1024);
    let writable = WritableStreamWrapper::new(near);

    writable
        .write(WriteData::Text("abc", Encoding::Ascii))
        .await
        .unwrap();
    writable.write(WriteData::Binary(b"def")).await.unwrap();
    writable.end().await;

    let mut received = Vec::new();
    far.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, b"abcdef");
}

#[tokio::test]
async fn WritableStreamWrapper___write_after_end___is_broken_pipe() {
    let (near, _far) = duplex(1024);
    let writable = WritableStreamWrapper::new(near);

    writable.end().await;
    let err = writable.write(WriteData::Binary(b"late")).await.unwrap_err();

    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert!(writable.is_ended().await);
}

#[tokio::test]
async fn WritableStreamWrapper___end___fires_end_and_close_once() {
    let (near, _far) = duplex(1024);
    let writable = WritableStreamWrapper::new(near);
    let events = Arc::new(AtomicUsize::new(0));

    let end_count = Arc::clone(&events);
    let _end = writable.on_end(Box::new(move || {
        end_count.fetch_add(1, Ordering::SeqCst);
    }));
    let close_count = Arc::clone(&events);
    let _close = writable.on_close(Box::new(move || {
        close_count.fetch_add(10, Ordering::SeqCst);
    }));

    writable.end().await;
    writable.end().await;

    assert_eq!(events.load(Ordering::SeqCst), 11);
}

#[tokio::test]
async fn WritableStreamWrapper___peer_gone___write_fails_and_emits_error() {
    let (near, far) = duplex(8);
    let writable = WritableStreamWrapper::new(near);
    let errors = Arc::new(AtomicUsize::new(0));
    let error_count = Arc::clone(&errors);
    let _err = writable.on_error(Box::new(move |_| {
        error_count.fetch_add(1, Ordering::SeqCst);
    }));
    drop(far);

    let result = writable.write(WriteData::Binary(b"nobody listens")).await;

    assert!(result.is_err());
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}
