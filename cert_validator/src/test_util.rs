// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Ed25519 certificate factory for unit tests.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::time::Duration;

use const_oid::ObjectIdentifier;
use der::asn1::{BitString, OctetString, UtcTime};
use der::Encode;
use ring::signature::{Ed25519KeyPair, KeyPair};
use spki::AlgorithmIdentifier;

use crate::certificate::name::{name_from_pairs, Name, CN};
use crate::certificate::{
    Certificate, Extension, Extensions, SubjectPublicKeyInfo, TBSCertificate, Version,
};
use crate::time::{Clock, FixedClock, Time, Validity};
use crate::x509::extensions::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, KeyUsage, NetscapeCertType,
};
use crate::x509::oids;

/// 2024-01-01T00:00:00Z, the instant every test validates at.
pub const NOW: u64 = 1_704_067_200;

pub fn now() -> Time {
    Time::from_unix_duration(Duration::from_secs(NOW)).unwrap()
}

pub fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(now()))
}

/// Seconds since the epoch at midnight UTC.
pub fn unix_of(year: u16, month: u8, day: u8) -> u64 {
    Time::from_date(year, month, day)
        .unwrap()
        .unix_duration()
        .as_secs()
}

fn ed25519() -> AlgorithmIdentifier<der::Any> {
    AlgorithmIdentifier {
        oid: oids::ED25519,
        parameters: None,
    }
}

fn key_pair(seed: u8) -> Ed25519KeyPair {
    Ed25519KeyPair::from_seed_unchecked(&[seed; 32]).unwrap()
}

fn utc(secs: u64) -> Time {
    Time::UtcTime(UtcTime::from_unix_duration(Duration::from_secs(secs)).unwrap())
}

pub struct CertBuilder {
    cn: &'static str,
    seed: u8,
    serial: u8,
    version: Version,
    not_before: u64,
    not_after: u64,
    basic_constraints: Option<BasicConstraints>,
    key_usage: Option<(u16, bool)>,
    eku: Option<Vec<ObjectIdentifier>>,
    netscape: Option<u8>,
    skid: Option<Vec<u8>>,
    akid: Option<Vec<u8>>,
    extra: Vec<Extension>,
}

impl CertBuilder {
    /// End entity without extensions.
    pub fn leaf(cn: &'static str) -> Self {
        Self {
            cn,
            seed: cn.bytes().fold(0u8, |acc, b| acc.wrapping_add(b)),
            serial: 1,
            version: Version::V3,
            not_before: unix_of(2020, 1, 1),
            not_after: unix_of(2030, 1, 1),
            basic_constraints: None,
            key_usage: None,
            eku: None,
            netscape: None,
            skid: None,
            akid: None,
            extra: Vec::new(),
        }
    }

    /// CA with keyCertSign and cRLSign.
    pub fn ca(cn: &'static str, path_len: u32) -> Self {
        let mut builder = Self::leaf(cn);
        builder.basic_constraints = Some(BasicConstraints::new_ca(Some(path_len)));
        builder.key_usage = Some((KeyUsage::KEY_CERT_SIGN | KeyUsage::CRL_SIGN, true));
        builder
    }

    /// CA without a path length constraint.
    pub fn ca_unbounded(cn: &'static str) -> Self {
        let mut builder = Self::ca(cn, 0);
        builder.basic_constraints = Some(BasicConstraints::new_ca(None));
        builder
    }

    pub fn key_seed(mut self, seed: u8) -> Self {
        self.seed = seed;
        self
    }

    pub fn serial(mut self, serial: u8) -> Self {
        self.serial = serial;
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn validity(mut self, not_before: u64, not_after: u64) -> Self {
        self.not_before = not_before;
        self.not_after = not_after;
        self
    }

    pub fn key_usage(mut self, bits: u16) -> Self {
        self.key_usage = Some((bits, false));
        self
    }

    pub fn critical_key_usage(mut self, bits: u16) -> Self {
        self.key_usage = Some((bits, true));
        self
    }

    pub fn eku(mut self, purposes: Vec<ObjectIdentifier>) -> Self {
        self.eku = Some(purposes);
        self
    }

    pub fn netscape(mut self, bits: u8) -> Self {
        self.netscape = Some(bits);
        self
    }

    pub fn skid(mut self, id: &[u8]) -> Self {
        self.skid = Some(id.to_vec());
        self
    }

    pub fn akid(mut self, id: &[u8]) -> Self {
        self.akid = Some(id.to_vec());
        self
    }

    pub fn extension(mut self, oid: ObjectIdentifier, critical: bool, value: &[u8]) -> Self {
        self.extra.push(Extension::new(oid, critical, value.to_vec()).unwrap());
        self
    }

    pub fn self_signed(self) -> Certificate {
        let seed = self.seed;
        let issuer = name_from_pairs(&[(CN, self.cn)]).unwrap();
        self.finish(issuer, seed)
    }

    pub fn signed_by(self, issuer: &Certificate, issuer_seed: u8) -> Certificate {
        self.finish(issuer.subject().clone(), issuer_seed)
    }

    fn extensions(&self) -> Vec<Extension> {
        let mut exts = Vec::new();
        if let Some(bc) = &self.basic_constraints {
            exts.push(Extension::new(oids::BASIC_CONSTRAINTS, true, bc.to_der().unwrap()).unwrap());
        }
        if let Some((bits, critical)) = self.key_usage {
            let value = KeyUsage::new(bits).to_der().unwrap();
            exts.push(Extension::new(oids::KEY_USAGE, critical, value).unwrap());
        }
        if let Some(purposes) = &self.eku {
            let value = ExtendedKeyUsage::new(purposes.clone()).to_der().unwrap();
            exts.push(Extension::new(oids::EXTENDED_KEY_USAGE, false, value).unwrap());
        }
        if let Some(bits) = self.netscape {
            let value = NetscapeCertType::new(bits).to_der().unwrap();
            exts.push(Extension::new(oids::NETSCAPE_CERT_TYPE, false, value).unwrap());
        }
        if let Some(id) = &self.skid {
            let value = OctetString::new(id.clone()).unwrap().to_der().unwrap();
            exts.push(Extension::new(oids::SUBJECT_KEY_IDENTIFIER, false, value).unwrap());
        }
        if let Some(id) = &self.akid {
            let value = AuthorityKeyIdentifier::new(id).unwrap().to_der().unwrap();
            exts.push(Extension::new(oids::AUTHORITY_KEY_IDENTIFIER, false, value).unwrap());
        }
        exts.extend(self.extra.iter().cloned());
        exts
    }

    fn finish(self, issuer: Name, issuer_seed: u8) -> Certificate {
        let subject_key = key_pair(self.seed);
        let spki = SubjectPublicKeyInfo {
            algorithm: ed25519(),
            subject_public_key: BitString::from_bytes(subject_key.public_key().as_ref()).unwrap(),
        };
        let subject = name_from_pairs(&[(CN, self.cn)]).unwrap();
        let validity = Validity::new(utc(self.not_before), utc(self.not_after));

        let mut tbs = TBSCertificate::new(
            vec![self.serial],
            ed25519(),
            issuer,
            validity,
            subject,
            spki,
        );
        tbs.version = self.version;
        let exts = self.extensions();
        if self.version == Version::V3 && !exts.is_empty() {
            tbs = tbs.with_extensions(Extensions::from_vec(exts));
        }

        let signature = key_pair(issuer_seed).sign(&tbs.to_der().unwrap());
        Certificate::new(
            tbs,
            ed25519(),
            BitString::from_bytes(signature.as_ref()).unwrap(),
        )
    }
}
