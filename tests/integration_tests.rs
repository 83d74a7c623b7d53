use linechat::core::pump::{run_inbound, SERVER_CLOSED_MESSAGE};
use linechat::{
    ChatError, Connection, ConnectionSettings, EchoServer, PumpExit, ReadOutcome, Session,
    SessionSettings,
};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};

/// End-to-end tests against real sockets
#[cfg(test)]
mod integration_tests {
    use super::*;

    fn settings_for(addr: SocketAddr) -> ConnectionSettings {
        ConnectionSettings {
            connect_timeout_ms: 2000,
            ..ConnectionSettings::new(addr.ip().to_string(), addr.port())
        }
    }

    fn session_settings() -> SessionSettings {
        SessionSettings {
            shutdown_grace_ms: 2000,
            ..SessionSettings::default()
        }
    }

    #[tokio::test]
    async fn test_hello_hi_scenario() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = socket.into_split();
            write_half.write_all(b"hello\n").await.unwrap();

            let mut received = Vec::new();
            BufReader::new(read_half).read_to_end(&mut received).await.unwrap();
            received
        });

        let connection = assert_ok!(Connection::connect(&settings_for(addr)).await);
        let (output, mut console) = tokio::io::duplex(64 * 1024);

        let summary = Session::new(connection, session_settings())
            .run(&b"hi\n"[..], output, tokio::io::sink())
            .await;

        // The client shut its write half down, so the server sees EOF after "hi"
        let received = server.await.unwrap();
        assert_eq!(received, b"hi\n");

        let mut printed = String::new();
        console.read_to_string(&mut printed).await.unwrap();
        assert!(printed.starts_with("=> hello\n"), "printed: {:?}", printed);

        assert_eq!(summary.outbound.exit, PumpExit::InputExhausted);
        assert_eq!(summary.lines_sent(), 1);
        assert_eq!(summary.lines_received(), Some(1));
    }

    #[tokio::test]
    async fn test_echo_round_trip_through_session() {
        let mut server = EchoServer::new("127.0.0.1:0").await.unwrap();
        server.start().await.unwrap();

        let connection = Connection::connect(&settings_for(server.get_bind_addr())).await.unwrap();
        let (output, mut console) = tokio::io::duplex(64 * 1024);

        let summary = Session::new(connection, session_settings())
            .run(&b"one\ntwo\n"[..], output, tokio::io::sink())
            .await;

        let mut printed = String::new();
        console.read_to_string(&mut printed).await.unwrap();
        assert_eq!(printed, format!("=> one\n=> two\n{}\n", SERVER_CLOSED_MESSAGE));
        assert_eq!(summary.inbound.map(|r| r.exit), Some(PumpExit::EndOfStream));

        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_line_stops_transmission() {
        let mut server = EchoServer::new("127.0.0.1:0").await.unwrap();
        server.start().await.unwrap();

        let connection = Connection::connect(&settings_for(server.get_bind_addr())).await.unwrap();
        let summary = Session::new(connection, session_settings())
            .run(&b"first\n\nsecond\n"[..], tokio::io::sink(), tokio::io::sink())
            .await;

        assert_eq!(summary.outbound.exit, PumpExit::EmptyInput);
        assert_eq!(summary.lines_sent(), 1);

        let message = server.receive_message().await.unwrap();
        assert_eq!(message.line, "first");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(server.try_receive_message().is_none());

        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_first_input_writes_nothing() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let connection = Connection::connect(&settings_for(addr)).await.unwrap();
        let summary = Session::new(connection, session_settings())
            .run(&b"\n"[..], tokio::io::sink(), tokio::io::sink())
            .await;

        assert_eq!(summary.outbound.exit, PumpExit::EmptyInput);
        assert!(server.await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_close_reported_once() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"bye\n").await.unwrap();
        });

        let connection = Connection::connect(&settings_for(addr)).await.unwrap();
        let (reader, _writer) = connection.into_split();
        let mut output: Vec<u8> = Vec::new();

        let report = run_inbound(reader, &mut output, "=> ").await;

        assert_eq!(report.exit, PumpExit::EndOfStream);
        assert_eq!(report.lines, 1);
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text, format!("=> bye\n{}\n", SERVER_CLOSED_MESSAGE));
    }

    #[tokio::test]
    async fn test_burst_of_server_lines_keeps_order() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut payload = String::new();
            for i in 0..2000 {
                payload.push_str(&format!("line {}\n", i));
            }
            socket.write_all(payload.as_bytes()).await.unwrap();
        });

        let connection = Connection::connect(&settings_for(addr)).await.unwrap();
        let (reader, _writer) = connection.into_split();
        let mut output: Vec<u8> = Vec::new();

        let report = run_inbound(reader, &mut output, "").await;
        assert_eq!(report.lines, 2000);

        let text = String::from_utf8(output).unwrap();
        for (i, line) in text.lines().take(2000).enumerate() {
            assert_eq!(line, format!("line {}", i));
        }
    }

    #[tokio::test]
    async fn test_unreachable_port_fails_fast() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let started = Instant::now();
        let error = assert_err!(Connection::connect(&settings_for(addr)).await);

        assert!(matches!(error, ChatError::Connection { .. }));
        assert!(error.to_string().starts_with("Failed to connect"));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_line_writer_reader_against_echo_server() {
        let mut server = EchoServer::new("127.0.0.1:0").await.unwrap();
        server.start().await.unwrap();

        let connection = Connection::connect(&settings_for(server.get_bind_addr())).await.unwrap();
        let (mut reader, mut writer) = connection.into_split();

        for line in ["plain", "with spaces", "ünïcödé ✓", "tab\tinside"] {
            assert_ok!(writer.write_line(line).await);
            match reader.read_line().await {
                ReadOutcome::Line(echoed) => assert_eq!(echoed, line),
                other => panic!("unexpected read outcome: {:?}", other),
            }
        }

        assert_ok!(writer.close().await);
        assert!(matches!(reader.read_line().await, ReadOutcome::EndOfStream));

        server.stop().await.unwrap();
    }
}
