//! End-to-end flows through the whole lifecycle:
//! compose → encrypt → split → combine → classify → decrypt.

use seedparts_core::pipeline::{
    classify_payload, create_shares, generate_key_pair, recover_payload, unlock_payload,
    validate_private_key, validate_public_key,
};
use seedparts_core::{
    compose_secret, Classification, Credential, CredentialKind, DecryptionCredential,
    EncryptionStrategy, EncryptionType, Language, PipelineError, PrivateKeyCredential, SeedPhrase,
    Supersession,
};
use seedparts_shamir::ThresholdParams;
use zeroize::Zeroizing;

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn strategy(encryption: EncryptionType) -> EncryptionStrategy {
    EncryptionStrategy::for_type(encryption)
}

/// Every T-sized window of the share list
fn windows(shares: &[String], threshold: usize) -> Vec<Vec<String>> {
    (0..=shares.len() - threshold)
        .map(|start| shares[start..start + threshold].to_vec())
        .collect()
}

// ============================================================================
// Plaintext
// ============================================================================

#[tokio::test]
async fn test_plaintext_seed_phrase_roundtrip() {
    let phrase = SeedPhrase::parse(ABANDON).unwrap();
    let secret = compose_secret("Cold storage, vault 2", Some(&phrase));
    let expected = secret.to_string();

    let shares = create_shares(
        secret,
        strategy(EncryptionType::None),
        None,
        ThresholdParams::three_of_five(),
    )
    .await
    .unwrap();
    assert_eq!(shares.len(), 5);

    for window in windows(&shares, 3) {
        let payload = recover_payload(window).await.unwrap();
        assert_eq!(
            classify_payload(payload.clone()).await.unwrap(),
            Classification::Plaintext
        );
        let recovered = unlock_payload(payload, None).await.unwrap();
        assert_eq!(recovered.secret.as_str(), expected);
    }
}

#[tokio::test]
async fn test_spanish_seed_phrase_roundtrip() {
    let words = format!("{}abierto", "ábaco ".repeat(11));
    let phrase = SeedPhrase::parse(&words).unwrap();
    assert_eq!(phrase.language(), Language::Spanish);

    let secret = compose_secret("Billetera fría", Some(&phrase));
    let expected = secret.to_string();
    let shares = create_shares(
        secret,
        strategy(EncryptionType::Password),
        Some(Credential::password("contraseña")),
        ThresholdParams::two_of_three(),
    )
    .await
    .unwrap();

    let payload = recover_payload(shares[1..].to_vec()).await.unwrap();
    let recovered = unlock_payload(payload, Some(DecryptionCredential::password("contraseña")))
        .await
        .unwrap();
    assert_eq!(recovered.secret.as_str(), expected);
    assert!(recovered.secret.ends_with("12. abierto\n"));
}

#[tokio::test]
async fn test_share_order_does_not_matter() {
    let shares = create_shares(
        Zeroizing::new("order independent".into()),
        strategy(EncryptionType::None),
        None,
        ThresholdParams::two_of_three(),
    )
    .await
    .unwrap();

    let forward = recover_payload(vec![shares[0].clone(), shares[2].clone()])
        .await
        .unwrap();
    let backward = recover_payload(vec![shares[2].clone(), shares[0].clone()])
        .await
        .unwrap();
    assert_eq!(forward, backward);

    // More than the threshold works too
    let all = recover_payload(shares).await.unwrap();
    assert_eq!(all, b"order independent");
}

// ============================================================================
// Password
// ============================================================================

#[tokio::test]
async fn test_password_flow_with_credential_prompting() {
    let shares = create_shares(
        Zeroizing::new("my secret notes".into()),
        strategy(EncryptionType::Password),
        Some(Credential::password("correct horse")),
        ThresholdParams::three_of_five(),
    )
    .await
    .unwrap();

    let payload = recover_payload(vec![
        shares[4].clone(),
        shares[1].clone(),
        shares[2].clone(),
    ])
    .await
    .unwrap();

    let classification = classify_payload(payload.clone()).await.unwrap();
    assert_eq!(classification, Classification::PasswordEncrypted);
    assert_eq!(
        classification.required_credential(),
        Some(CredentialKind::Password)
    );

    // No credential: asked for a password
    assert!(matches!(
        unlock_payload(payload.clone(), None).await,
        Err(PipelineError::MissingCredential(CredentialKind::Password))
    ));

    // Wrong, then right
    assert!(matches!(
        unlock_payload(
            payload.clone(),
            Some(DecryptionCredential::password("wrong horse"))
        )
        .await,
        Err(PipelineError::DecryptionFailed)
    ));
    let recovered = unlock_payload(payload, Some(DecryptionCredential::password("correct horse")))
        .await
        .unwrap();
    assert_eq!(recovered.secret.as_str(), "my secret notes");
    assert_eq!(recovered.classification, Classification::PasswordEncrypted);
}

#[tokio::test]
async fn test_password_required_to_encrypt() {
    let err = create_shares(
        Zeroizing::new("my secret".into()),
        strategy(EncryptionType::Password),
        None,
        ThresholdParams::two_of_three(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, PipelineError::PreconditionViolation(_)));
}

// ============================================================================
// Key pair
// ============================================================================

#[tokio::test]
async fn test_key_pair_flow_with_locked_key() {
    let pair = generate_key_pair(Some(Zeroizing::new("key passphrase".into())))
        .await
        .unwrap();

    let public = validate_public_key(pair.public_armored.clone()).await.unwrap();
    assert_eq!(public.fingerprint, pair.fingerprint);

    let shares = create_shares(
        Zeroizing::new("inheritance instructions".into()),
        strategy(EncryptionType::Key),
        Some(Credential::public_key(pair.public_armored.clone())),
        ThresholdParams::new(4, 2).unwrap(),
    )
    .await
    .unwrap();

    let payload = recover_payload(vec![shares[3].clone(), shares[0].clone()])
        .await
        .unwrap();
    assert_eq!(
        classify_payload(payload.clone()).await.unwrap(),
        Classification::KeyEncrypted
    );

    // Key imported, passphrase not yet entered
    let info = validate_private_key(pair.private_armored.clone()).await.unwrap();
    assert!(info.passphrase_required);
    let key = PrivateKeyCredential::import(pair.private_armored.as_str()).unwrap();
    assert!(matches!(
        unlock_payload(payload.clone(), Some(DecryptionCredential::PrivateKey(key.clone()))).await,
        Err(PipelineError::MissingCredential(CredentialKind::Passphrase))
    ));

    let key = key.with_passphrase("key passphrase");
    let recovered = unlock_payload(payload, Some(DecryptionCredential::PrivateKey(key)))
        .await
        .unwrap();
    assert_eq!(recovered.secret.as_str(), "inheritance instructions");
    assert_eq!(recovered.classification, Classification::KeyEncrypted);
}

#[tokio::test]
async fn test_unprotected_key_needs_no_passphrase() {
    let pair = generate_key_pair(None).await.unwrap();
    let shares = create_shares(
        Zeroizing::new("plain key flow".into()),
        strategy(EncryptionType::Key),
        Some(Credential::public_key(pair.public_armored.clone())),
        ThresholdParams::two_of_three(),
    )
    .await
    .unwrap();

    let payload = recover_payload(shares[1..].to_vec()).await.unwrap();
    let key = PrivateKeyCredential::import(pair.private_armored.as_str()).unwrap();
    assert!(!key.passphrase_required);

    let recovered = unlock_payload(payload, Some(DecryptionCredential::PrivateKey(key)))
        .await
        .unwrap();
    assert_eq!(recovered.secret.as_str(), "plain key flow");
}

// ============================================================================
// Share list editing
// ============================================================================

#[tokio::test]
async fn test_incremental_share_entry() {
    let shares = create_shares(
        Zeroizing::new("typed in one share at a time".into()),
        strategy(EncryptionType::None),
        None,
        ThresholdParams::three_of_five(),
    )
    .await
    .unwrap();

    let mut entered: Vec<String> = vec![String::new()];

    entered[0] = shares[2].clone();
    assert!(matches!(
        recover_payload(entered.clone()).await,
        Err(PipelineError::Combine(_))
    ));

    entered.push(shares[0].clone());
    assert!(recover_payload(entered.clone()).await.is_err());

    entered.push(String::new());
    entered.push(shares[4].clone());
    let payload = recover_payload(entered).await.unwrap();
    assert_eq!(payload, b"typed in one share at a time");
}

#[tokio::test]
async fn test_supersession_keeps_latest_recovery() {
    let shares = create_shares(
        Zeroizing::new("latest wins".into()),
        strategy(EncryptionType::None),
        None,
        ThresholdParams::two_of_three(),
    )
    .await
    .unwrap();

    let supersession = Supersession::new();
    let first = supersession
        .run(recover_payload(shares[..2].to_vec()))
        .await;
    assert_eq!(first.unwrap().unwrap(), b"latest wins");

    let stale = supersession.issue();
    let second = supersession.run(recover_payload(shares[1..].to_vec())).await;
    assert!(!supersession.is_current(stale));
    assert_eq!(second.unwrap().unwrap(), b"latest wins");
}
